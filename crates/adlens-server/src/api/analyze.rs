use axum::Json;
use axum::extract::{Query, State};
use tracing::info;

use adlens_pipeline::corpus::DEMO_URL;
use adlens_pipeline::types::{PipelineResult, Platform};

use crate::error::AppError;
use crate::state::AppState;
use crate::types::{AnalysisData, AnalyzeQuery, AnalyzeRequest, SuccessEnvelope};

type AnalyzeResponse = Result<Json<SuccessEnvelope<AnalysisData>>, AppError>;

/// Browser-friendly entry point: query params only, always post-launch.
pub async fn analyze_get(
    State(state): State<AppState>,
    Query(query): Query<AnalyzeQuery>,
) -> AnalyzeResponse {
    info!(mode = "post", "received analyze request");
    run_post(&state, query.url).await
}

pub async fn analyze_post(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> AnalyzeResponse {
    let mode = req.mode.as_deref().unwrap_or("post");
    info!(mode, "received analyze request");

    match mode {
        "post" => run_post(&state, req.url).await,
        "pre" => run_pre(&state, req).await,
        _ => Err(AppError::BadRequest("Invalid mode".into())),
    }
}

async fn run_post(state: &AppState, url: Option<String>) -> AnalyzeResponse {
    // Missing URL means the bundled demo fixture.
    let url = url.filter(|u| !u.is_empty()).unwrap_or_else(|| DEMO_URL.into());
    let platform = Platform::detect(Some(&url));

    let results = state.pipeline.run_post_analysis(platform, Some(&url)).await;
    respond(results, "Analysis of comments for the campaign.".into())
}

async fn run_pre(state: &AppState, req: AnalyzeRequest) -> AnalyzeResponse {
    let missing = || AppError::BadRequest("Missing image or text for pre-analysis".into());
    let image = req.image.filter(|i| !i.is_empty()).ok_or_else(missing)?;
    let text = req.text.filter(|t| !t.is_empty()).ok_or_else(missing)?;
    let platform = req.platform.unwrap_or(Platform::Linkedin);
    let target = req.target.unwrap_or_default();

    let results = state
        .pipeline
        .run_pre_analysis(&image, &text, platform, target)
        .await;
    respond(
        results,
        format!("Predictive analysis for {platform} targeting {target}."),
    )
}

fn respond(results: PipelineResult, summary: String) -> AnalyzeResponse {
    if let Some(error) = results.error {
        return Err(AppError::Pipeline(error));
    }
    Ok(Json(SuccessEnvelope::new(AnalysisData {
        summary,
        strategy: results.strategy,
    })))
}
