use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Model label reported for batch entries that failed before reaching the backend.
pub const FAILED_MODEL_LABEL: &str = "error";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CaptionStyle {
    Short,
    Detailed,
    Alt,
    Creative,
}

impl CaptionStyle {
    /// Styles used when a request does not name any.
    pub const DEFAULTS: [Self; 3] = [Self::Short, Self::Detailed, Self::Alt];

    #[must_use]
    pub fn defaults() -> Vec<Self> {
        Self::DEFAULTS.to_vec()
    }
}

/// Requested tone. Accepted for compatibility, it does not change the captions.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Funny,
}

/// The caption variants derived from one backend description.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, ToSchema)]
pub struct CaptionResult {
    pub short: Option<String>,
    pub detailed: Option<String>,
    pub alt: Option<String>,
    pub creative: Option<String>,
    /// Set only on batch entries that failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CaptionResult {
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct CaptionMetadata {
    /// Seconds spent on this image.
    pub processing_time: f64,
    pub model_used: String,
    /// Original `[width, height]`, before downscaling.
    #[schema(value_type = Option<Vec<u32>>)]
    pub image_size: Option<(u32, u32)>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct CaptionResponse {
    pub image_id: String,
    pub captions: CaptionResult,
    pub metadata: CaptionMetadata,
    pub timestamp: DateTime<Utc>,
}

impl CaptionResponse {
    /// Wraps captions and metadata with a fresh id and the current time.
    #[must_use]
    pub fn new(captions: CaptionResult, metadata: CaptionMetadata) -> Self {
        Self {
            image_id: Uuid::new_v4().to_string(),
            captions,
            metadata,
            timestamp: Utc::now(),
        }
    }

    /// In-band result for a batch entry that could not be processed.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(
            CaptionResult::failed(message),
            CaptionMetadata {
                processing_time: 0.0,
                model_used: FAILED_MODEL_LABEL.to_string(),
                image_size: None,
            },
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct BatchResponse {
    pub results: Vec<CaptionResponse>,
    pub total_processing_time: f64,
    pub success_count: usize,
    pub error_count: usize,
}
