use common_types::{CaptionStyle, Tone};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const MIN_CAPTION_LENGTH: usize = 10;
pub const MAX_CAPTION_LENGTH: usize = 500;
pub const DEFAULT_CAPTION_LENGTH: usize = 150;

const fn default_max_length() -> i64 {
    DEFAULT_CAPTION_LENGTH as i64
}

fn default_language() -> String {
    "en".to_string()
}

// --- Request Payloads ---

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct CaptionRequest {
    /// Base64 encoded image data, a `data:` uri prefix is allowed.
    pub image: String,
    #[serde(default = "CaptionStyle::defaults")]
    pub styles: Vec<CaptionStyle>,
    #[serde(default)]
    pub tone: Tone,
    /// Clamped to 10..=500.
    #[serde(default = "default_max_length")]
    pub max_length: i64,
    /// Language code, accepted but not used.
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct CaptionUrlRequest {
    /// URL of the image to caption.
    pub url: String,
    #[serde(default = "CaptionStyle::defaults")]
    pub styles: Vec<CaptionStyle>,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default = "default_max_length")]
    pub max_length: i64,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct BatchRequest {
    /// Base64 encoded images.
    pub images: Vec<String>,
    #[serde(default = "CaptionStyle::defaults")]
    pub styles: Vec<CaptionStyle>,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default = "default_max_length")]
    pub max_length: i64,
}

/// Style selection shared by every entry point, with `max_length` already clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionOptions {
    pub styles: Vec<CaptionStyle>,
    pub tone: Tone,
    pub max_length: usize,
}

impl CaptionOptions {
    #[must_use]
    pub fn new(styles: Vec<CaptionStyle>, tone: Tone, max_length: i64) -> Self {
        let max_length = max_length.clamp(MIN_CAPTION_LENGTH as i64, MAX_CAPTION_LENGTH as i64);
        Self {
            styles,
            tone,
            max_length: max_length as usize,
        }
    }

    /// Fixed options used for multipart uploads.
    #[must_use]
    pub fn upload_defaults() -> Self {
        Self::new(
            CaptionStyle::defaults(),
            Tone::Professional,
            default_max_length(),
        )
    }
}

impl From<&CaptionRequest> for CaptionOptions {
    fn from(request: &CaptionRequest) -> Self {
        Self::new(request.styles.clone(), request.tone, request.max_length)
    }
}

impl From<&CaptionUrlRequest> for CaptionOptions {
    fn from(request: &CaptionUrlRequest) -> Self {
        Self::new(request.styles.clone(), request.tone, request.max_length)
    }
}

impl From<&BatchRequest> for CaptionOptions {
    fn from(request: &BatchRequest) -> Self {
        Self::new(request.styles.clone(), request.tone, request.max_length)
    }
}
