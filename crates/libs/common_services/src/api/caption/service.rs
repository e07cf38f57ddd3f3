use super::error::CaptionError;
use super::interfaces::{BatchRequest, CaptionOptions, CaptionRequest, CaptionUrlRequest};
use super::normalizer::{decode_base64_image, normalize_image_blocking};
use super::styles::derive_styles;
use crate::stores::HistoryStore;
use app_state::{AppSettings, CaptionSettings};
use common_types::{
    BatchResponse, CaptionMetadata, CaptionResponse, HistoryItem, thumbnail_preview,
};
use futures_util::{StreamExt, stream};
use language_model::VisionClient;
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};
use url::Url;

/// Caption text used when the backend answered with nothing.
pub const EMPTY_CAPTION_MARKER: &str = "Error: Caption generation failed.";

/// Runs images through normalization, the vision backend and style derivation.
#[derive(Clone)]
pub struct CaptionService {
    vision: VisionClient,
    http: Client,
    settings: CaptionSettings,
    history: Arc<dyn HistoryStore>,
}

impl CaptionService {
    #[must_use]
    pub fn new(settings: &AppSettings, history: Arc<dyn HistoryStore>) -> Self {
        let http = Client::new();
        let captioning = &settings.captioning;
        let vision = VisionClient::with_base_url(&captioning.base_url)
            .http(http.clone())
            .model(captioning.model.clone())
            .maybe_api_key(settings.secrets.hf_api_token.clone())
            .max_tokens(captioning.max_tokens)
            .temperature(captioning.temperature)
            .timeout(captioning.caption_timeout)
            .build();
        Self::with_clients(vision, http, captioning.clone(), history)
    }

    #[must_use]
    pub fn with_clients(
        vision: VisionClient,
        http: Client,
        settings: CaptionSettings,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            vision,
            http,
            settings,
            history,
        }
    }

    /// Captions an inline image and records it in history.
    #[instrument(skip(self, request), fields(payload_len = request.image.len()))]
    pub async fn caption_inline(
        &self,
        request: &CaptionRequest,
    ) -> Result<CaptionResponse, CaptionError> {
        let response = self
            .caption_base64(&request.image, &CaptionOptions::from(request))
            .await?;
        self.remember(&response, thumbnail_preview(&request.image))
            .await;
        Ok(response)
    }

    /// Fetches and captions a remote image, history keeps the url as thumbnail.
    #[instrument(skip(self, request), fields(url = %request.url))]
    pub async fn caption_url(
        &self,
        request: &CaptionUrlRequest,
    ) -> Result<CaptionResponse, CaptionError> {
        let bytes = self.fetch_image(&request.url).await?;
        let response = self
            .caption_bytes(bytes, &CaptionOptions::from(request))
            .await?;
        self.remember(&response, request.url.clone()).await;
        Ok(response)
    }

    /// Captions an uploaded file with the fixed upload options. Not added to history.
    #[instrument(skip(self, bytes), fields(upload_bytes = bytes.len()))]
    pub async fn caption_upload(&self, bytes: Vec<u8>) -> Result<CaptionResponse, CaptionError> {
        self.caption_bytes(bytes, &CaptionOptions::upload_defaults())
            .await
    }

    /// Captions every image, at most `batch_concurrency` at a time, keeping input order.
    ///
    /// A failing entry becomes an in-band error result instead of failing the batch.
    #[instrument(skip(self, request), fields(images = request.images.len()))]
    pub async fn caption_batch(&self, request: &BatchRequest) -> BatchResponse {
        let start = Instant::now();
        let options = CaptionOptions::from(request);

        let futures: Vec<_> = request
            .images
            .iter()
            .map(|image| self.caption_base64(image, &options))
            .collect();
        let outcomes: Vec<Result<CaptionResponse, CaptionError>> =
            stream::iter(futures)
                .buffered(self.settings.batch_concurrency)
                .collect()
                .await;

        let mut error_count = 0;
        let results: Vec<CaptionResponse> = outcomes
            .into_iter()
            .enumerate()
            .map(|(index, outcome)| {
                outcome.unwrap_or_else(|e| {
                    warn!("Batch item {index} failed: {e}");
                    error_count += 1;
                    CaptionResponse::failed(e.to_string())
                })
            })
            .collect();

        info!(
            "Batch done: {} ok, {} failed in {:?}",
            results.len() - error_count,
            error_count,
            start.elapsed()
        );
        BatchResponse {
            success_count: results.len() - error_count,
            error_count,
            results,
            total_processing_time: start.elapsed().as_secs_f64(),
        }
    }

    /// Captions a base64 payload, the core shared by inline and batch requests.
    pub async fn caption_base64(
        &self,
        payload: &str,
        options: &CaptionOptions,
    ) -> Result<CaptionResponse, CaptionError> {
        let start = Instant::now();
        let bytes = decode_base64_image(payload)?;
        self.caption_from(start, bytes, options).await
    }

    pub async fn caption_bytes(
        &self,
        bytes: Vec<u8>,
        options: &CaptionOptions,
    ) -> Result<CaptionResponse, CaptionError> {
        self.caption_from(Instant::now(), bytes, options).await
    }

    /// Downloads an image, failing on a bad url, network error or non-success status.
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, CaptionError> {
        let parsed: Url = url
            .parse()
            .map_err(|e| CaptionError::Fetch(format!("invalid url {url}: {e}")))?;
        let response = self
            .http
            .get(parsed)
            .timeout(self.settings.fetch_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CaptionError::Fetch(format!("{url} returned {status}")));
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn caption_from(
        &self,
        start: Instant,
        bytes: Vec<u8>,
        options: &CaptionOptions,
    ) -> Result<CaptionResponse, CaptionError> {
        let normalized = normalize_image_blocking(
            bytes,
            self.settings.max_dimension,
            self.settings.jpeg_quality,
        )
        .await?;

        let base_caption = self.describe(&normalized.jpeg).await;
        let captions = derive_styles(&base_caption, &options.styles, options.max_length);

        Ok(CaptionResponse::new(
            captions,
            CaptionMetadata {
                processing_time: start.elapsed().as_secs_f64(),
                model_used: self.settings.model_label.clone(),
                image_size: Some(normalized.original_size),
            },
        ))
    }

    /// Backend failures are data here: they turn into an `Error:` caption.
    async fn describe(&self, jpeg: &[u8]) -> String {
        match self.vision.describe_image(&self.settings.prompt, jpeg).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => {
                warn!("Caption failed: backend returned no text");
                EMPTY_CAPTION_MARKER.to_string()
            }
            Err(e) => {
                warn!("Caption failed: {e}");
                e.soft_fail_marker()
            }
        }
    }

    async fn remember(&self, response: &CaptionResponse, thumbnail: String) {
        self.history
            .insert_front(HistoryItem::from_response(response, thumbnail))
            .await;
    }
}
