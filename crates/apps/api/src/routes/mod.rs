mod api_doc;
pub mod caption;
pub mod history;
pub mod root;

use crate::api_state::ApiContext;
use crate::caption::router::caption_router;
use crate::history::router::history_router;
use crate::root::router::root_public_router;
use crate::routes::api_doc::ApiDoc;
use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// --- Router Construction ---
pub fn create_router(api_state: ApiContext) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .merge(root_public_router())
        .merge(caption_router())
        .merge(history_router())
        .with_state(api_state)
}
