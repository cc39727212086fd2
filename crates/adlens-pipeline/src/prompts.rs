use std::path::PathBuf;

use adlens_core::error::{Result, TemplateError};
use tracing::warn;

use crate::types::{Cohort, Platform};

/// Strategist base instruction template.
pub const STRATEGIST_TEMPLATE: &str = "negotiate_suggestions.prompt";

/// Template carrying the persona instructions for a post-launch comment
/// analysis, per platform and cohort.
pub fn comment_analysis_template(platform: Platform, cohort: Cohort) -> &'static str {
    match (platform, cohort) {
        (Platform::Linkedin, Cohort::Youth) => "analyze_campaign.prompt",
        (Platform::Linkedin, Cohort::Adult) => "analyze_campaign_30_50.prompt",
        (Platform::Instagram, Cohort::Youth) => "analyze_instagram_18_30.prompt",
        (Platform::Instagram, Cohort::Adult) => "analyze_instagram_30_50.prompt",
    }
}

/// Resolves named prompt templates from a directory on disk.
///
/// Missing templates are recoverable: callers log and abort only the branch
/// that needed the template.
#[derive(Debug, Clone)]
pub struct PromptStore {
    dir: PathBuf,
}

impl PromptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn load(&self, name: &str) -> Result<String> {
        let path = self.dir.join(name);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(template = name, error = %e, "cannot load prompt template");
                Err(TemplateError::NotFound(name.to_string()).into())
            }
        }
    }
}
