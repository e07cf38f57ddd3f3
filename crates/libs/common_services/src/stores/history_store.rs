use crate::api::history::error::HistoryError;
use async_trait::async_trait;
use common_types::{HistoryItem, HistoryResponse};
use std::collections::VecDeque;
use tokio::sync::Mutex;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Recency ordered record of caption results, newest first.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Adds an item at the front, evicting the oldest items past capacity.
    async fn insert_front(&self, item: HistoryItem);

    /// Page of at most `limit` items starting at `offset`, with the total stored count.
    async fn list(&self, limit: usize, offset: usize) -> HistoryResponse;

    /// Flips the favorite flag of the first item with `image_id` and returns the new value.
    async fn toggle_favorite(&self, image_id: &str) -> Result<bool, HistoryError>;

    async fn delete(&self, image_id: &str) -> Result<(), HistoryError>;

    async fn clear(&self);
}

#[derive(Debug)]
pub struct InMemoryHistoryStore {
    capacity: usize,
    items: Mutex<VecDeque<HistoryItem>>,
}

impl InMemoryHistoryStore {
    /// A store holding at most `capacity` items, never fewer than one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let preallocated = capacity.min(DEFAULT_HISTORY_CAPACITY) + 1;
        Self {
            capacity,
            items: Mutex::new(VecDeque::with_capacity(preallocated)),
        }
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn insert_front(&self, item: HistoryItem) {
        let mut items = self.items.lock().await;
        items.push_front(item);
        items.truncate(self.capacity);
    }

    async fn list(&self, limit: usize, offset: usize) -> HistoryResponse {
        let items = self.items.lock().await;
        HistoryResponse {
            items: items.iter().skip(offset).take(limit).cloned().collect(),
            total_count: items.len(),
        }
    }

    async fn toggle_favorite(&self, image_id: &str) -> Result<bool, HistoryError> {
        let mut items = self.items.lock().await;
        let item = items
            .iter_mut()
            .find(|item| item.image_id == image_id)
            .ok_or_else(|| HistoryError::NotFound(image_id.to_string()))?;
        item.is_favorite = !item.is_favorite;
        Ok(item.is_favorite)
    }

    async fn delete(&self, image_id: &str) -> Result<(), HistoryError> {
        let mut items = self.items.lock().await;
        let index = items
            .iter()
            .position(|item| item.image_id == image_id)
            .ok_or_else(|| HistoryError::NotFound(image_id.to_string()))?;
        items.remove(index);
        Ok(())
    }

    async fn clear(&self) {
        self.items.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common_types::CaptionResult;
    use std::sync::Arc;

    fn item(id: &str) -> HistoryItem {
        HistoryItem {
            image_id: id.to_string(),
            thumbnail: format!("https://example.com/{id}.jpg"),
            captions: CaptionResult::default(),
            timestamp: Utc::now(),
            is_favorite: false,
        }
    }

    fn ids(page: &HistoryResponse) -> Vec<&str> {
        page.items.iter().map(|i| i.image_id.as_str()).collect()
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let store = InMemoryHistoryStore::default();
        let page = store.list(20, 0).await;
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 0);
    }

    #[tokio::test]
    async fn newest_item_comes_first() {
        let store = InMemoryHistoryStore::default();
        for id in ["a", "b", "c"] {
            store.insert_front(item(id)).await;
        }
        assert_eq!(ids(&store.list(20, 0).await), vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn capacity_evicts_oldest() {
        let store = InMemoryHistoryStore::default();
        for n in 0..60 {
            store.insert_front(item(&n.to_string())).await;
            assert!(store.list(100, 0).await.total_count <= DEFAULT_HISTORY_CAPACITY);
        }
        let page = store.list(100, 0).await;
        assert_eq!(page.total_count, 50);
        assert_eq!(page.items.first().map(|i| i.image_id.as_str()), Some("59"));
        assert_eq!(page.items.last().map(|i| i.image_id.as_str()), Some("10"));
    }

    #[tokio::test]
    async fn pagination_reports_total() {
        let store = InMemoryHistoryStore::new(10);
        for n in 0..7 {
            store.insert_front(item(&n.to_string())).await;
        }
        let page = store.list(2, 1).await;
        assert_eq!(ids(&page), vec!["5", "4"]);
        assert_eq!(page.total_count, 7);

        let past_end = store.list(5, 30).await;
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total_count, 7);
    }

    #[tokio::test]
    async fn toggle_twice_restores_flag() -> Result<(), HistoryError> {
        let store = InMemoryHistoryStore::default();
        store.insert_front(item("fav")).await;

        assert!(store.toggle_favorite("fav").await?);
        assert!(!store.toggle_favorite("fav").await?);
        assert!(!store.list(1, 0).await.items[0].is_favorite);
        Ok(())
    }

    #[tokio::test]
    async fn toggle_unknown_is_not_found() {
        let store = InMemoryHistoryStore::default();
        assert_eq!(
            store.toggle_favorite("missing").await,
            Err(HistoryError::NotFound("missing".to_string()))
        );
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let store = InMemoryHistoryStore::default();
        store.insert_front(item("a")).await;
        store.insert_front(item("b")).await;

        assert_eq!(store.delete("a").await, Ok(()));
        assert_eq!(
            store.delete("a").await,
            Err(HistoryError::NotFound("a".to_string()))
        );
        assert_eq!(ids(&store.list(20, 0).await), vec!["b"]);
    }

    #[tokio::test]
    async fn duplicates_are_kept_and_first_match_wins() -> Result<(), HistoryError> {
        let store = InMemoryHistoryStore::default();
        store.insert_front(item("same")).await;
        store.insert_front(item("same")).await;

        assert!(store.toggle_favorite("same").await?);
        let page = store.list(20, 0).await;
        assert_eq!(page.total_count, 2);
        assert!(page.items[0].is_favorite);
        assert!(!page.items[1].is_favorite);
        Ok(())
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let store = InMemoryHistoryStore::default();
        store.insert_front(item("a")).await;
        store.clear().await;
        store.clear().await;
        assert_eq!(store.list(20, 0).await.total_count, 0);
    }

    #[tokio::test]
    async fn zero_capacity_still_keeps_newest() {
        let store = InMemoryHistoryStore::new(0);
        store.insert_front(item("a")).await;
        store.insert_front(item("b")).await;
        assert_eq!(ids(&store.list(20, 0).await), vec!["b"]);
    }

    #[tokio::test]
    async fn concurrent_inserts_respect_capacity() {
        let store: Arc<dyn HistoryStore> = Arc::new(InMemoryHistoryStore::new(50));
        let handles: Vec<_> = (0..200)
            .map(|n| {
                let store = store.clone();
                tokio::spawn(async move { store.insert_front(item(&n.to_string())).await })
            })
            .collect();
        for handle in handles {
            handle.await.expect("insert task panicked");
        }
        assert_eq!(store.list(500, 0).await.total_count, 50);
    }
}
