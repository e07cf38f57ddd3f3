use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_HISTORY_LIMIT: usize = 20;

const fn default_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

// --- URL/Query Parameters ---

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct HistoryParams {
    /// Page size.
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Number of newest items to skip.
    #[serde(default)]
    pub offset: usize,
}

// --- Response Payloads ---

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    #[must_use]
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct FavoriteResponse {
    pub status: String,
    pub is_favorite: bool,
}
