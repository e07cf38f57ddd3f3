use crate::{ApiSettings, HistorySettings, LoggingSettings, RawCaptionSettings, RawSettings};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub api: ApiSettings,
    pub logging: LoggingSettings,
    pub captioning: CaptionSettings,
    pub history: HistorySettings,
    pub secrets: SecretSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CaptionSettings {
    pub base_url: String,
    pub model: String,
    pub model_label: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub caption_timeout: Duration,
    pub fetch_timeout: Duration,
    pub max_dimension: u32,
    pub jpeg_quality: u8,
    pub batch_concurrency: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecretSettings {
    /// `None` when no usable token is configured.
    pub hf_api_token: Option<String>,
}

impl From<RawCaptionSettings> for CaptionSettings {
    fn from(raw: RawCaptionSettings) -> Self {
        Self {
            base_url: raw.base_url.trim_end_matches('/').to_string(),
            model: raw.model,
            model_label: raw.model_label,
            prompt: raw.prompt,
            max_tokens: raw.max_tokens,
            temperature: raw.temperature,
            caption_timeout: Duration::from_secs(raw.caption_timeout_secs),
            fetch_timeout: Duration::from_secs(raw.fetch_timeout_secs),
            max_dimension: raw.max_dimension.max(1),
            jpeg_quality: raw.jpeg_quality.clamp(1, 100),
            batch_concurrency: raw.batch_concurrency.max(1),
        }
    }
}

impl From<RawSettings> for AppSettings {
    fn from(raw: RawSettings) -> Self {
        let hf_api_token = raw
            .secrets
            .hf_api_token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());

        Self {
            api: raw.api,
            logging: raw.logging,
            captioning: raw.captioning.into(),
            history: HistorySettings {
                capacity: raw.history.capacity.max(1),
            },
            secrets: SecretSettings { hf_api_token },
        }
    }
}

impl AppSettings {
    #[must_use]
    pub fn has_api_token(&self) -> bool {
        self.secrets.hf_api_token.is_some()
    }
}
