pub mod analyze;
pub mod revise;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::state::AppState;

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route(
            "/analyze",
            get(analyze::analyze_get).post(analyze::analyze_post),
        )
        .route("/apply-suggestions", post(revise::apply_suggestions))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "running",
        "message": "Backend agent server is up. Use POST /analyze."
    }))
}
