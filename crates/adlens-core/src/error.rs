use thiserror::Error;

/// Top-level error type for the Adlens library.
#[derive(Debug, Error)]
pub enum AdlensError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Failures from the generative-model gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("API request failed: {0}")]
    ApiRequest(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limited: retry after {retry_after_secs:?}s")]
    RateLimited { retry_after_secs: Option<u64> },
}

/// Failures resolving a named prompt template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Cannot load prompt {0}")]
    NotFound(String),
}

/// Failures resolving a local comment fixture.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Data file not found: {0}")]
    FixtureNotFound(String),
}

/// Process-wide configuration problems, checked once per pipeline run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY or GOOGLE_API_KEY environment variable not set")]
    MissingApiKey,
}

pub type Result<T> = std::result::Result<T, AdlensError>;
