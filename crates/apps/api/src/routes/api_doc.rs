use crate::routes::{caption, history, root};
use common_services::api::caption::interfaces::{BatchRequest, CaptionRequest, CaptionUrlRequest};
use common_services::api::history::interfaces::{FavoriteResponse, StatusResponse};
use common_types::{
    BatchResponse, CaptionMetadata, CaptionResponse, CaptionResult, CaptionStyle, HistoryItem,
    HistoryResponse, Tone,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        root::handlers::root,
        root::handlers::health_check,
        // Caption handlers
        caption::handlers::caption_handler,
        caption::handlers::caption_url_handler,
        caption::handlers::caption_upload_handler,
        caption::handlers::batch_caption_handler,
        // History handlers
        history::handlers::get_history_handler,
        history::handlers::toggle_favorite_handler,
        history::handlers::delete_history_item_handler,
        history::handlers::clear_history_handler,
    ),
    components(
        schemas(
            CaptionStyle,
            Tone,
            CaptionRequest,
            CaptionUrlRequest,
            BatchRequest,
            CaptionResult,
            CaptionMetadata,
            CaptionResponse,
            BatchResponse,
            HistoryItem,
            HistoryResponse,
            StatusResponse,
            FavoriteResponse,
        ),
    ),
    tags(
        (name = "Image Caption", description = "Image captioning API backed by a hosted vision model"),
        (name = "Caption", description = "Caption generation from inline images, URLs, uploads and batches"),
        (name = "History", description = "Recent caption results kept in memory"),
        (name = "System", description = "Health check"),
    )
)]
pub struct ApiDoc;
