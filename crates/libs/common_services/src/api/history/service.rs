use super::error::HistoryError;
use super::interfaces::{FavoriteResponse, HistoryParams, StatusResponse};
use crate::stores::HistoryStore;
use common_types::HistoryResponse;
use tracing::{info, instrument};

#[instrument(skip(store))]
pub async fn get_history(store: &dyn HistoryStore, params: &HistoryParams) -> HistoryResponse {
    store.list(params.limit, params.offset).await
}

#[instrument(skip(store))]
pub async fn toggle_favorite(
    store: &dyn HistoryStore,
    image_id: &str,
) -> Result<FavoriteResponse, HistoryError> {
    let is_favorite = store.toggle_favorite(image_id).await?;
    Ok(FavoriteResponse {
        status: StatusResponse::success().status,
        is_favorite,
    })
}

#[instrument(skip(store))]
pub async fn delete_history_item(
    store: &dyn HistoryStore,
    image_id: &str,
) -> Result<StatusResponse, HistoryError> {
    store.delete(image_id).await?;
    Ok(StatusResponse::success())
}

#[instrument(skip(store))]
pub async fn clear_history(store: &dyn HistoryStore) -> StatusResponse {
    store.clear().await;
    info!("History cleared");
    StatusResponse::success()
}
