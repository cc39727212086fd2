use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use adlens_core::error::AdlensError;

/// Application error type that maps to the uniform failure envelope.
///
/// 400 is reserved for client input validation; everything else is 500.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Pipeline(String),
    Internal(String),
}

impl From<AdlensError> for AppError {
    fn from(err: AdlensError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Pipeline(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = json!({ "success": false, "error": message });
        (status, axum::Json(body)).into_response()
    }
}
