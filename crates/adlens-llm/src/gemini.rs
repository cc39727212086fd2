use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use adlens_core::error::{AdlensError, GatewayError, Result};
use adlens_core::message::{
    AIContent, ContentPart, ContentSource, Message, MessageContent, UsageMetadata,
};
use adlens_core::model::{CallOptions, ChatModel, ChatResult, ResponseFormat};

pub const DEFAULT_MODEL_ID: &str = "gemini-2.5-flash";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// ---------------------------------------------------------------------------
// Gemini API request types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<GeminiInlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiInlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Gemini API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    pub candidates: Option<Vec<GeminiCandidate>>,
    #[serde(rename = "usageMetadata")]
    pub usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    pub content: GeminiContent,
}

#[derive(Debug, Deserialize)]
pub struct GeminiUsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    pub prompt_token_count: u64,
    #[serde(rename = "candidatesTokenCount", default)]
    pub candidates_token_count: u64,
    #[serde(rename = "totalTokenCount", default)]
    pub total_token_count: u64,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

fn text_part(text: String) -> GeminiPart {
    GeminiPart {
        text: Some(text),
        inline_data: None,
    }
}

fn message_content_to_gemini_parts(mc: &MessageContent) -> Vec<GeminiPart> {
    match mc {
        MessageContent::Text(s) => vec![text_part(s.clone())],
        MessageContent::Parts(parts) => parts.iter().map(content_part_to_gemini).collect(),
    }
}

fn content_part_to_gemini(part: &ContentPart) -> GeminiPart {
    match part {
        ContentPart::Text { text } => text_part(text.clone()),
        ContentPart::Image {
            source: ContentSource::Base64 { media_type, data },
        } => GeminiPart {
            text: None,
            inline_data: Some(GeminiInlineData {
                mime_type: media_type.clone(),
                data: data.clone(),
            }),
        },
    }
}

// ---------------------------------------------------------------------------
// GeminiChatModel
// ---------------------------------------------------------------------------

pub struct GeminiChatModel {
    api_key: String,
    model_id: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiChatModel {
    pub fn new(api_key: String, model_id: String) -> Self {
        Self {
            api_key,
            model_id,
            base_url: DEFAULT_BASE_URL.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the client at a different endpoint (tests use a local mock).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn build_request(&self, messages: &[Message], options: &CallOptions) -> GeminiRequest {
        let mut system_instruction: Option<GeminiContent> = None;
        let mut contents: Vec<GeminiContent> = Vec::new();

        for msg in messages {
            match msg {
                Message::System { content } => {
                    system_instruction = Some(GeminiContent {
                        role: None,
                        parts: message_content_to_gemini_parts(content),
                    });
                }
                Message::User { content } => {
                    contents.push(GeminiContent {
                        role: Some("user".into()),
                        parts: message_content_to_gemini_parts(content),
                    });
                }
                Message::AI(ai) => {
                    contents.push(GeminiContent {
                        role: Some("model".into()),
                        parts: vec![text_part(ai.content.clone())],
                    });
                }
            }
        }

        let response_mime_type = match options.response_format {
            Some(ResponseFormat::JsonObject) => Some("application/json".to_string()),
            Some(ResponseFormat::Text) | None => None,
        };

        let generation_config = if options.max_tokens.is_some()
            || options.temperature.is_some()
            || response_mime_type.is_some()
        {
            Some(GenerationConfig {
                max_output_tokens: options.max_tokens,
                temperature: options.temperature,
                response_mime_type,
            })
        } else {
            None
        };

        GeminiRequest {
            system_instruction,
            contents,
            generation_config,
        }
    }
}

#[async_trait]
impl ChatModel for GeminiChatModel {
    async fn generate(&self, messages: &[Message], options: &CallOptions) -> Result<ChatResult> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model_id, self.api_key
        );

        let request_body = self.build_request(messages, options);

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AdlensError::Gateway(GatewayError::ApiRequest(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read response body".into());
            return Err(AdlensError::Gateway(
                if status.as_u16() == 401 || status.as_u16() == 403 {
                    GatewayError::Auth(body)
                } else if status.as_u16() == 429 {
                    GatewayError::RateLimited {
                        retry_after_secs: None,
                    }
                } else {
                    GatewayError::ApiRequest(format!("HTTP {status}: {body}"))
                },
            ));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AdlensError::Gateway(GatewayError::InvalidResponse(e.to_string())))?;

        let mut text_parts = Vec::new();
        if let Some(candidates) = &gemini_response.candidates
            && let Some(candidate) = candidates.first()
        {
            for part in &candidate.content.parts {
                if let Some(text) = &part.text {
                    text_parts.push(text.clone());
                }
            }
        }

        let text = text_parts.join("");

        let usage = gemini_response.usage_metadata.map(|u| UsageMetadata {
            input_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        Ok(ChatResult {
            message: Message::AI(AIContent {
                content: text,
                usage: usage.clone(),
            }),
            usage,
        })
    }

    fn model_name(&self) -> &str {
        &self.model_id
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
