use axum::Json;
use axum::extract::{Path, Query, State};
use common_services::api::history::error::HistoryError;
use common_services::api::history::interfaces::{
    FavoriteResponse, HistoryParams, StatusResponse,
};
use common_services::api::history::service::{
    clear_history, delete_history_item, get_history, toggle_favorite,
};
use common_services::stores::HistoryStore;
use common_types::HistoryResponse;
use std::sync::Arc;

/// List caption history, newest first.
#[utoipa::path(
    get,
    path = "/api/history",
    tag = "History",
    params(HistoryParams),
    responses(
        (status = 200, description = "A page of history items and the total count.", body = HistoryResponse),
    )
)]
pub async fn get_history_handler(
    State(history): State<Arc<dyn HistoryStore>>,
    Query(params): Query<HistoryParams>,
) -> Json<HistoryResponse> {
    Json(get_history(history.as_ref(), &params).await)
}

/// Flip the favorite flag of a history item.
#[utoipa::path(
    post,
    path = "/api/history/{image_id}/favorite",
    tag = "History",
    params(
        ("image_id" = String, Path, description = "Id of the captioned image.")
    ),
    responses(
        (status = 200, description = "The new favorite state.", body = FavoriteResponse),
        (status = 404, description = "Image not found in history."),
    )
)]
pub async fn toggle_favorite_handler(
    State(history): State<Arc<dyn HistoryStore>>,
    Path(image_id): Path<String>,
) -> Result<Json<FavoriteResponse>, HistoryError> {
    Ok(Json(toggle_favorite(history.as_ref(), &image_id).await?))
}

/// Remove one item from history.
#[utoipa::path(
    delete,
    path = "/api/history/{image_id}",
    tag = "History",
    params(
        ("image_id" = String, Path, description = "Id of the captioned image.")
    ),
    responses(
        (status = 200, description = "Item removed.", body = StatusResponse),
        (status = 404, description = "Image not found in history."),
    )
)]
pub async fn delete_history_item_handler(
    State(history): State<Arc<dyn HistoryStore>>,
    Path(image_id): Path<String>,
) -> Result<Json<StatusResponse>, HistoryError> {
    Ok(Json(
        delete_history_item(history.as_ref(), &image_id).await?,
    ))
}

/// Remove every item from history.
#[utoipa::path(
    delete,
    path = "/api/history",
    tag = "History",
    responses(
        (status = 200, description = "History cleared.", body = StatusResponse),
    )
)]
pub async fn clear_history_handler(State(history): State<Arc<dyn HistoryStore>>) -> Json<StatusResponse> {
    Json(clear_history(history.as_ref()).await)
}
