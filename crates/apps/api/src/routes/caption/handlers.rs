use axum::Json;
use axum::extract::{Multipart, State};
use common_services::api::caption::error::CaptionError;
use common_services::api::caption::interfaces::{BatchRequest, CaptionRequest, CaptionUrlRequest};
use common_services::api::caption::service::CaptionService;
use common_types::{BatchResponse, CaptionResponse};
use tracing::info;

/// Multipart field that carries the uploaded image.
pub const UPLOAD_FIELD: &str = "file";

/// Caption a base64 encoded image.
///
/// The result is added to the front of the history.
#[utoipa::path(
    post,
    path = "/api/caption",
    tag = "Caption",
    request_body = CaptionRequest,
    responses(
        (status = 200, description = "Captions in the requested styles.", body = CaptionResponse),
        (status = 500, description = "The image could not be decoded or processed."),
    )
)]
pub async fn caption_handler(
    State(service): State<CaptionService>,
    Json(payload): Json<CaptionRequest>,
) -> Result<Json<CaptionResponse>, CaptionError> {
    let response = service.caption_inline(&payload).await?;
    Ok(Json(response))
}

/// Caption an image downloaded from a URL.
#[utoipa::path(
    post,
    path = "/api/caption-url",
    tag = "Caption",
    request_body = CaptionUrlRequest,
    responses(
        (status = 200, description = "Captions in the requested styles.", body = CaptionResponse),
        (status = 500, description = "The image could not be fetched, decoded or processed."),
    )
)]
pub async fn caption_url_handler(
    State(service): State<CaptionService>,
    Json(payload): Json<CaptionUrlRequest>,
) -> Result<Json<CaptionResponse>, CaptionError> {
    let response = service.caption_url(&payload).await?;
    Ok(Json(response))
}

/// Caption an uploaded image file.
///
/// Always produces the short, detailed and alt styles. Uploads are not kept in history.
#[utoipa::path(
    post,
    path = "/api/caption-upload",
    tag = "Caption",
    request_body(content_type = "multipart/form-data", description = "Image in the `file` field."),
    responses(
        (status = 200, description = "Captions for the uploaded image.", body = CaptionResponse),
        (status = 400, description = "No file was uploaded."),
        (status = 500, description = "The file could not be decoded or processed."),
    )
)]
pub async fn caption_upload_handler(
    State(service): State<CaptionService>,
    mut multipart: Multipart,
) -> Result<Json<CaptionResponse>, CaptionError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| CaptionError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        info!("Caption upload {:?}", field.file_name());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| CaptionError::BadRequest(e.body_text()))?;
        let response = service.caption_upload(bytes.to_vec()).await?;
        return Ok(Json(response));
    }
    Err(CaptionError::BadRequest(format!(
        "missing multipart field '{UPLOAD_FIELD}'"
    )))
}

/// Caption several base64 images in one request.
///
/// Results keep the input order. An image that fails gets an `error` caption instead of
/// failing the whole batch.
#[utoipa::path(
    post,
    path = "/api/batch",
    tag = "Caption",
    request_body = BatchRequest,
    responses(
        (status = 200, description = "One result per input image.", body = BatchResponse),
    )
)]
pub async fn batch_caption_handler(
    State(service): State<CaptionService>,
    Json(payload): Json<BatchRequest>,
) -> Json<BatchResponse> {
    Json(service.caption_batch(&payload).await)
}
