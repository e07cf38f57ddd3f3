use crate::api_state::ApiContext;
use crate::routes::caption::handlers::{
    batch_caption_handler, caption_handler, caption_upload_handler, caption_url_handler,
};
use axum::{Router, routing::post};

pub fn caption_router() -> Router<ApiContext> {
    Router::new()
        .route("/api/caption", post(caption_handler))
        .route("/api/caption-url", post(caption_url_handler))
        .route("/api/caption-upload", post(caption_upload_handler))
        .route("/api/batch", post(batch_caption_handler))
}
