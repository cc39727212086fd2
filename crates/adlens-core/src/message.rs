use serde::{Deserialize, Serialize};

/// Metadata about token usage from a gateway call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub input_tokens: u64,
    pub output_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Where the bytes of a non-text content part come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentSource {
    /// Inline base64-encoded data with its media type.
    Base64 { media_type: String, data: String },
}

/// One part of a multimodal message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    Image { source: ContentSource },
}

/// Message content: plain text or a list of multimodal parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Concatenated text of all textual parts.
    pub fn text(&self) -> String {
        match self {
            MessageContent::Text(s) => s.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::Image { .. } => None,
                })
                .collect::<Vec<_>>()
                .join(""),
        }
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        MessageContent::Text(s.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(s: String) -> Self {
        MessageContent::Text(s)
    }
}

/// Content of a generated (model) message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AIContent {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageMetadata>,
}

/// A chat message exchanged with the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    #[serde(rename = "system")]
    System { content: MessageContent },

    #[serde(rename = "user")]
    User { content: MessageContent },

    #[serde(rename = "ai")]
    AI(AIContent),
}

impl Message {
    pub fn system(content: impl Into<MessageContent>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<MessageContent>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    /// A user message carrying text plus one inline base64 image.
    pub fn user_with_image(
        text: impl Into<String>,
        media_type: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Message::User {
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::Image {
                    source: ContentSource::Base64 {
                        media_type: media_type.into(),
                        data: data.into(),
                    },
                },
            ]),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Message::AI(AIContent {
            content: content.into(),
            usage: None,
        })
    }

    /// Extract the text content from any message variant.
    pub fn content(&self) -> String {
        match self {
            Message::System { content } => content.text(),
            Message::User { content } => content.text(),
            Message::AI(ai) => ai.content.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_message_serde_roundtrip() {
        let msg = Message::system("You are a marketing strategist.");
        let json = serde_json::to_string(&msg).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, deserialized);
        assert!(json.contains(r#""type":"system"#));
    }

    #[test]
    fn user_message_serde_roundtrip() {
        let msg = Message::user("Hello!");
        let json = serde_json::to_string(&msg).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, deserialized);
        assert!(json.contains(r#""type":"user"#));
    }

    #[test]
    fn ai_message_serde_roundtrip() {
        let msg = Message::ai("Looks engaging.");
        let json = serde_json::to_string(&msg).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, deserialized);
        assert!(json.contains(r#""type":"ai"#));
    }

    #[test]
    fn user_with_image_carries_both_parts() {
        let msg = Message::user_with_image("caption", "image/png", "aGVsbG8=");
        match &msg {
            Message::User {
                content: MessageContent::Parts(parts),
            } => {
                assert_eq!(parts.len(), 2);
                assert!(matches!(parts[0], ContentPart::Text { .. }));
                assert!(matches!(parts[1], ContentPart::Image { .. }));
            }
            _ => panic!("expected multimodal user message"),
        }
        assert_eq!(msg.content(), "caption");
    }

    #[test]
    fn empty_ai_content_omits_usage() {
        let msg = Message::ai("");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("usage"));
    }

    #[test]
    fn content_accessor() {
        assert_eq!(Message::system("sys").content(), "sys");
        assert_eq!(Message::user("usr").content(), "usr");
        assert_eq!(Message::ai("generated").content(), "generated");
    }

    #[test]
    fn deserialize_plain_text_user_message() {
        let json = r#"{"type":"user","content":"test message"}"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.content(), "test message");
    }

    #[test]
    fn multimodal_content_text_skips_images() {
        let content = MessageContent::Parts(vec![
            ContentPart::Text {
                text: "before ".into(),
            },
            ContentPart::Image {
                source: ContentSource::Base64 {
                    media_type: "image/jpeg".into(),
                    data: "Zm9v".into(),
                },
            },
            ContentPart::Text {
                text: "after".into(),
            },
        ]);
        assert_eq!(content.text(), "before after");
    }
}
