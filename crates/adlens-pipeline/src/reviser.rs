use adlens_core::error::Result;
use adlens_core::message::Message;
use adlens_core::model::{CallOptions, ChatModel};
use tracing::info;

/// Apply strategic suggestions to a caption: one gateway call asking for a
/// rewritten caption plus an image-generation prompt, as raw JSON text.
///
/// The response is returned verbatim; failures are terminal for this entry
/// point.
pub async fn apply_suggestions(
    gateway: &dyn ChatModel,
    content: &str,
    suggestions: &str,
) -> Result<String> {
    let prompt = format!(
        r#"You are an expert Copywriter and Creative Director.

Original Content: "{content}"

Strategic Suggestions to Apply:
{suggestions}

Task:
1. Rewrite the caption/text content to incorporate the suggestions. Make it engaging.
2. Create a detailed Image Generation Prompt that would result in a visual matching the suggestions.

Output JSON:
{{
    "new_content": "...",
    "new_image_prompt": "..."
}}"#
    );

    let result = gateway
        .generate(&[Message::user(prompt)], &CallOptions::json())
        .await?;
    info!("content revision received");

    Ok(result.message.content())
}
