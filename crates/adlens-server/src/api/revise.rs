use axum::Json;
use axum::extract::State;
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;
use crate::types::{ApplySuggestionsRequest, SuccessEnvelope};

pub async fn apply_suggestions(
    State(state): State<AppState>,
    Json(req): Json<ApplySuggestionsRequest>,
) -> Result<Json<SuccessEnvelope<String>>, AppError> {
    let missing = || AppError::BadRequest("Missing content or suggestions".into());
    let content = req.content.filter(|c| !c.is_empty()).ok_or_else(missing)?;
    let suggestions = req
        .suggestions
        .filter(|s| !s.is_empty())
        .ok_or_else(missing)?;

    info!("received apply-suggestions request");
    let data = state
        .pipeline
        .apply_suggestions(&content, &suggestions)
        .await
        .map_err(|e| AppError::Pipeline(e.to_string()))?;

    Ok(Json(SuccessEnvelope::new(data)))
}
