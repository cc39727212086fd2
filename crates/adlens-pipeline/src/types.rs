use serde::{Deserialize, Serialize};

/// Social platform a campaign runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linkedin,
    Instagram,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linkedin => "linkedin",
            Platform::Instagram => "instagram",
        }
    }

    /// Local comment fixture for this platform.
    pub fn fixture_file(&self) -> &'static str {
        match self {
            Platform::Linkedin => "linkedin_comments.json",
            Platform::Instagram => "instagram_comments.json",
        }
    }

    /// Detect the platform from a post URL; LinkedIn is the default.
    pub fn detect(url: Option<&str>) -> Self {
        match url {
            Some(u) if u.to_lowercase().contains("instagram") => Platform::Instagram,
            _ => Platform::Linkedin,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Post-launch (existing engagement) vs pre-launch (unreleased creative).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineMode {
    Post,
    Pre,
}

/// One of the two fixed audience personas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cohort {
    Youth,
    Adult,
}

impl Cohort {
    /// Age range the persona speaks for, as it appears in prompts.
    pub fn age_range(&self) -> &'static str {
        match self {
            Cohort::Youth => "18-30",
            Cohort::Adult => "30-50",
        }
    }
}

/// Which cohorts a pre-launch run should consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetGroup {
    All,
    Youth,
    Adult,
}

impl Default for TargetGroup {
    fn default() -> Self {
        TargetGroup::All
    }
}

impl std::fmt::Display for TargetGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TargetGroup::All => "all",
            TargetGroup::Youth => "youth",
            TargetGroup::Adult => "adult",
        })
    }
}

impl TargetGroup {
    pub fn includes(&self, cohort: Cohort) -> bool {
        matches!(
            (self, cohort),
            (TargetGroup::All, _)
                | (TargetGroup::Youth, Cohort::Youth)
                | (TargetGroup::Adult, Cohort::Adult)
        )
    }
}

/// Outcome of one cohort agent run. A failed or skipped run carries its
/// reason instead of silently vanishing; its text view is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CohortOutcome {
    Analyzed(String),
    Skipped { reason: String },
}

impl CohortOutcome {
    pub fn text(&self) -> &str {
        match self {
            CohortOutcome::Analyzed(text) => text,
            CohortOutcome::Skipped { .. } => "",
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, CohortOutcome::Skipped { .. })
    }
}

/// Aggregate result of one analysis pipeline run.
///
/// `error` is set only when no usable partial result exists: missing
/// configuration or fixture, an undecodable creative image, both cohorts
/// empty, or the strategist call itself failing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineResult {
    pub youth_analysis: String,
    pub adult_analysis: String,
    pub strategy: String,
    pub error: Option<String>,
}

impl PipelineResult {
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn has_any_analysis(&self) -> bool {
        !self.youth_analysis.is_empty() || !self.adult_analysis.is_empty()
    }
}
