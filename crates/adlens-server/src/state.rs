use std::path::PathBuf;
use std::sync::Arc;

use adlens_core::model::ChatModel;
use adlens_llm::gemini::{DEFAULT_MODEL_ID, GeminiChatModel};
use adlens_pipeline::Pipeline;
use adlens_pipeline::prompts::PromptStore;
use tracing::warn;

/// Process-wide settings, read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub prompts_dir: PathBuf,
    pub data_dir: PathBuf,
    pub api_key: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);
        let prompts_dir = std::env::var("ADLENS_PROMPTS_DIR")
            .unwrap_or_else(|_| "prompts".into())
            .into();
        let data_dir = std::env::var("ADLENS_DATA_DIR")
            .unwrap_or_else(|_| "data".into())
            .into();
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .ok();

        Self {
            port,
            prompts_dir,
            data_dir,
            api_key,
        }
    }
}

/// Shared application state: the wired pipeline behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn from_settings(settings: &Settings) -> Self {
        let gateway: Option<Arc<dyn ChatModel>> = match &settings.api_key {
            Some(key) => Some(Arc::new(GeminiChatModel::new(
                key.clone(),
                DEFAULT_MODEL_ID.into(),
            ))),
            None => {
                warn!("no API key configured; analysis calls will fail until one is set");
                None
            }
        };

        let pipeline = Pipeline::new(
            gateway,
            PromptStore::new(&settings.prompts_dir),
            &settings.data_dir,
        );

        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    pub fn with_pipeline(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}
