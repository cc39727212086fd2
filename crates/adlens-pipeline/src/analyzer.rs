use adlens_core::error::{AdlensError, Result};
use adlens_core::message::Message;
use adlens_core::model::{CallOptions, ChatModel};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::{info, warn};

use crate::corpus::clip_corpus;
use crate::prompts::{PromptStore, comment_analysis_template};
use crate::types::{Cohort, CohortOutcome, Platform};

/// Fixed persona used for pre-launch creative review.
fn creative_persona(cohort: Cohort) -> &'static str {
    match cohort {
        Cohort::Youth => {
            "You are a Gen-Z digital native (age 18-24). You are critical of ads. \
             You value authenticity, aesthetics, and humor. You hate corporate speak."
        }
        Cohort::Adult => {
            "You are a working professional (age 35-50). You value clarity, \
             value propositions, and professionalism. You are skeptical of clickbait."
        }
    }
}

/// An inline image ready to attach to a gateway message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub media_type: String,
    pub data: String,
}

/// Normalize a creative image payload: strip a data-URL prefix, verify the
/// base64 payload decodes, and pick up the declared media type.
pub fn decode_creative_image(image_b64: &str) -> Result<InlineImage> {
    let (media_type, data) = match image_b64.split_once("base64,") {
        Some((prefix, rest)) => {
            let media_type = prefix
                .strip_prefix("data:")
                .and_then(|p| p.strip_suffix(';'))
                .filter(|m| !m.is_empty())
                .unwrap_or("image/png");
            (media_type.to_string(), rest.to_string())
        }
        None => ("image/png".to_string(), image_b64.to_string()),
    };

    BASE64
        .decode(data.as_bytes())
        .map_err(|e| AdlensError::Other(format!("Invalid image data: {e}")))?;

    Ok(InlineImage { media_type, data })
}

/// Post-launch: run one cohort persona over the comment corpus.
///
/// Every failure is caught here and becomes a Skipped outcome so the sibling
/// cohort and the rest of the pipeline keep going.
pub async fn analyze_comments(
    gateway: &dyn ChatModel,
    prompts: &PromptStore,
    platform: Platform,
    cohort: Cohort,
    corpus: &str,
) -> CohortOutcome {
    let template = comment_analysis_template(platform, cohort);
    let instructions = match prompts.load(template) {
        Ok(text) => text,
        Err(e) => {
            warn!(?cohort, template, error = %e, "cohort agent skipped");
            return CohortOutcome::Skipped {
                reason: e.to_string(),
            };
        }
    };

    let message = format!(
        "Here is the comments data from {platform}:\n\n{corpus}\n\n\
         Please analyze these comments according to the instructions for the {age} age group.",
        corpus = clip_corpus(corpus),
        age = cohort.age_range(),
    );

    run_cohort_agent(gateway, cohort, instructions, Message::user(message)).await
}

/// Pre-launch: run one cohort persona over an unreleased creative
/// (image + caption).
pub async fn analyze_creative(
    gateway: &dyn ChatModel,
    platform: Platform,
    cohort: Cohort,
    image: &InlineImage,
    caption: &str,
) -> CohortOutcome {
    let task = format!(
        "You are analyzing a marketing creative for {platform}.\n\
         Please look at the attached image and the following caption: \"{caption}\"\n\n\
         Predict the reaction. Will it work? Is it 'cringe' or 'cool' (if youth)? \
         Is it 'trustworthy' or 'spammy' (if adult)?\n\
         Be specific about the visual elements and the copy."
    );

    let message = Message::user_with_image(task, image.media_type.clone(), image.data.clone());
    run_cohort_agent(gateway, cohort, creative_persona(cohort).to_string(), message).await
}

async fn run_cohort_agent(
    gateway: &dyn ChatModel,
    cohort: Cohort,
    instructions: String,
    message: Message,
) -> CohortOutcome {
    let messages = [Message::system(instructions), message];
    match gateway.generate(&messages, &CallOptions::default()).await {
        Ok(result) => {
            info!(?cohort, "cohort analysis received");
            CohortOutcome::Analyzed(result.message.content())
        }
        Err(e) => {
            warn!(?cohort, error = %e, "cohort agent failed");
            CohortOutcome::Skipped {
                reason: e.to_string(),
            }
        }
    }
}
