use crate::api_state::ApiContext;
use crate::routes::history::handlers::{
    clear_history_handler, delete_history_item_handler, get_history_handler,
    toggle_favorite_handler,
};
use axum::{
    Router,
    routing::{delete, get, post},
};

pub fn history_router() -> Router<ApiContext> {
    Router::new()
        .route(
            "/api/history",
            get(get_history_handler).delete(clear_history_handler),
        )
        .route(
            "/api/history/{image_id}/favorite",
            post(toggle_favorite_handler),
        )
        .route("/api/history/{image_id}", delete(delete_history_item_handler))
}
