use serde::{Deserialize, Serialize};

use adlens_pipeline::types::{Platform, TargetGroup};

/// `POST /analyze` request body. The mode travels as a string so unknown
/// values map to a 400 rather than a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub platform: Option<Platform>,
    #[serde(default)]
    pub target: Option<TargetGroup>,
}

/// `GET /analyze` query string.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeQuery {
    #[serde(default)]
    pub url: Option<String>,
}

/// Payload of a successful analysis.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisData {
    pub summary: String,
    pub strategy: String,
}

/// Uniform success envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> SuccessEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `POST /apply-suggestions` request body.
#[derive(Debug, Default, Deserialize)]
pub struct ApplySuggestionsRequest {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub suggestions: Option<String>,
}
