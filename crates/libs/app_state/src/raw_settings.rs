use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub api: ApiSettings,
    pub logging: LoggingSettings,
    pub captioning: RawCaptionSettings,
    pub history: HistorySettings,
    pub secrets: RawSecretSettings,
}

/// Configuration for the API server.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub host: String,
    pub port: u32,
    pub allowed_origins: Vec<String>,
    /// Upper bound for request bodies, covers inline base64 payloads and uploads.
    pub max_upload_bytes: usize,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

/// Vision backend and image normalization settings, as written in the settings file.
#[derive(Debug, Deserialize, Clone)]
pub struct RawCaptionSettings {
    /// Base url of the OpenAI-compatible endpoint, `/v1/chat/completions` is appended.
    pub base_url: String,
    pub model: String,
    /// Reported as `model_used` in caption metadata.
    pub model_label: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub caption_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
    /// Longest side of the image sent to the backend.
    pub max_dimension: u32,
    /// JPEG quality 1..=100.
    pub jpeg_quality: u8,
    /// How many batch items may be in flight at once.
    pub batch_concurrency: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistorySettings {
    pub capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawSecretSettings {
    #[serde(default)]
    pub hf_api_token: Option<String>,
}
