use adlens_core::error::Result;
use adlens_core::message::Message;
use adlens_core::model::{CallOptions, ChatModel};
use tracing::info;

use crate::prompts::{PromptStore, STRATEGIST_TEMPLATE};
use crate::types::PipelineMode;

/// Pipeline error set when neither cohort produced an analysis.
pub const NO_ANALYSIS_ERROR: &str = "No analysis generated from agents.";

/// Mode-dependent fragment injected into the output contract: hashtag
/// guidance for a live post, pros/cons for an unreleased creative.
fn mode_fields(mode: PipelineMode) -> &'static str {
    match mode {
        PipelineMode::Post => {
            r##""hashtag_strategy": {
    "trending": ["#Trend1", "#Trend2"],
    "niche": ["#Niche1", "#Niche2"],
    "insight": "Explain why these tags were chosen..."
},"##
        }
        PipelineMode::Pre => {
            r#""pros_cons": {
    "pros": ["list of strong points..."],
    "cons": ["list of weak points..."]
},"#
        }
    }
}

/// The strict output-format directive appended to the strategist's base
/// instruction. The model is asked for this shape; it is never enforced
/// locally.
fn output_contract(mode: PipelineMode) -> String {
    format!(
        r#"

CRITICAL: You must output your response in valid JSON format ONLY.
Structure:
{{
    "final_verdict": "HTML string with bold verdict and explanation. Keep it under 50 words.",
    "tone_analysis": {{
        "label": "e.g. Inspirational",
        "score": 88
    }},
    "engagement_metrics": {{
        "score": "8.5/10",
        "virality": "High/Medium/Low",
        "explanation": "Brief reason"
    }},
    {mode_fields}
    "strategic_suggestions": [
        {{"title": "...", "priority": "High/Medium", "description": "..."}}
    ],
    "shared_positives": ["points that both groups liked..."]
}}
Do not use markdown code blocks like ```json. Return raw JSON."#,
        mode_fields = mode_fields(mode),
    )
}

/// Reconcile both cohort analyses into one strategy document.
///
/// Callers guarantee at least one analysis is non-empty; any failure here
/// (missing template, gateway error) is terminal for the run.
pub async fn synthesize(
    gateway: &dyn ChatModel,
    prompts: &PromptStore,
    mode: PipelineMode,
    youth_analysis: &str,
    adult_analysis: &str,
) -> Result<String> {
    let mut instructions = prompts.load(STRATEGIST_TEMPLATE)?;
    instructions.push_str(&output_contract(mode));

    let message = format!(
        "Analysis 1 (Youth): {youth_analysis}\n\
         Analysis 2 (Adult): {adult_analysis}\n\n\
         Synthesize a strategy for this campaign properly."
    );

    info!(?mode, "sending analyses to strategist");
    let result = gateway
        .generate(
            &[Message::system(instructions), Message::user(message)],
            &CallOptions::default(),
        )
        .await?;
    info!("strategist synthesis received");

    Ok(result.message.content())
}

/// Optional validation hook: attempt to parse the strategy text as JSON.
///
/// Nothing in the serving path depends on this; downstream consumers take
/// the raw text as-is.
pub fn strategy_json(strategy: &str) -> Option<serde_json::Value> {
    serde_json::from_str(strategy.trim()).ok()
}
