use crate::{CaptionResponse, CaptionResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Previews of inline payloads are cut to this many characters.
pub const THUMBNAIL_PREVIEW_CHARS: usize = 500;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct HistoryItem {
    pub image_id: String,
    /// Truncated inline payload, or the source url.
    pub thumbnail: String,
    pub captions: CaptionResult,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl HistoryItem {
    #[must_use]
    pub fn from_response(response: &CaptionResponse, thumbnail: String) -> Self {
        Self {
            image_id: response.image_id.clone(),
            thumbnail,
            captions: response.captions.clone(),
            timestamp: response.timestamp,
            is_favorite: false,
        }
    }
}

/// Shortens an inline image payload for storage in history.
#[must_use]
pub fn thumbnail_preview(payload: &str) -> String {
    match payload.char_indices().nth(THUMBNAIL_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &payload[..cut]),
        None => payload.to_string(),
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct HistoryResponse {
    pub items: Vec<HistoryItem>,
    /// Number of stored items, not the length of this page.
    pub total_count: usize,
}
