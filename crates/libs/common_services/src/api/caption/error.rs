use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("Cannot decode image: {0}")]
    Decode(String),

    #[error("Cannot fetch image: {0}")]
    Fetch(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("internal error")]
    Internal(#[from] eyre::Report),
}

fn log_error(error: &CaptionError) {
    match error {
        CaptionError::Decode(message) => warn!("Caption -> Decode failed: {}", message),
        CaptionError::Fetch(message) => warn!("Caption -> Fetch failed: {}", message),
        CaptionError::BadRequest(message) => warn!("Caption -> Bad request: {}", message),
        CaptionError::Internal(e) => warn!("Internal error: {:?}", e),
    }
}

impl IntoResponse for CaptionError {
    fn into_response(self) -> Response {
        log_error(&self);

        // Decode and fetch failures are not classified, they surface as a 500 with the message.
        let (status, detail) = match self {
            Self::Decode(_) | Self::Fetch(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected internal error occurred.".to_string(),
            ),
        };

        let body = Json(json!({ "detail": detail }));
        (status, body).into_response()
    }
}

impl From<reqwest::Error> for CaptionError {
    fn from(err: reqwest::Error) -> Self {
        Self::Fetch(err.to_string())
    }
}

impl From<tokio::task::JoinError> for CaptionError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(eyre::Report::new(err))
    }
}

impl From<base64::DecodeError> for CaptionError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Decode(format!("invalid base64 payload: {err}"))
    }
}
