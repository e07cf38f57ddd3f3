use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Image not found in history")]
    NotFound(String),
}

impl IntoResponse for HistoryError {
    fn into_response(self) -> Response {
        let Self::NotFound(image_id) = &self;
        warn!("History -> Image not found: {}", image_id);

        let body = Json(json!({ "detail": self.to_string() }));
        (StatusCode::NOT_FOUND, body).into_response()
    }
}
