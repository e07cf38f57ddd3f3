use base64::{Engine as _, engine::general_purpose};
use bon::bon;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "Qwen/Qwen3-VL-30B-A3B-Instruct";

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("HF_API_TOKEN not configured.")]
    MissingCredential,
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{status} - {body}")]
    Api { status: u16, body: String },
}

impl VisionError {
    /// Legacy in-band form of this error, detectable by its `Error:` prefix.
    #[must_use]
    pub fn soft_fail_marker(&self) -> String {
        format!("Error: {self}")
    }
}

pub type VisionResult<T> = Result<T, VisionError>;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Message {
    pub role: String,
    pub content: Vec<MessagePart>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum MessagePart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
pub struct ChatFullResponse {
    pub choices: Vec<FullChoice>,
}

#[derive(Deserialize)]
pub struct FullChoice {
    pub message: FullMessage,
}

#[derive(Deserialize)]
pub struct FullMessage {
    pub content: Option<String>,
}

#[derive(Clone, Debug)]
pub struct VisionConfig {
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

/// Client for an OpenAI-compatible chat completions endpoint that accepts images.
#[derive(Clone)]
pub struct VisionClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    config: VisionConfig,
}

#[bon]
impl VisionClient {
    #[builder(start_fn = with_base_url)]
    #[must_use]
    pub fn new(
        #[builder(start_fn)] base_url: &str,
        http: Option<reqwest::Client>,
        model: Option<String>,
        api_key: Option<String>,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            http: http.unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: api_key.filter(|key| !key.is_empty()),
            config: VisionConfig {
                temperature: temperature.unwrap_or(0.7),
                max_tokens: max_tokens.unwrap_or(512),
                timeout: timeout.unwrap_or(Duration::from_secs(60)),
            },
        }
    }

    #[must_use]
    pub fn prepare_message(prompt: &str, image: &[u8]) -> Message {
        let mime_type = infer::get(image).map_or("image/jpeg", |kind| kind.mime_type());
        let b64 = general_purpose::STANDARD.encode(image);
        Message {
            role: "user".to_string(),
            content: vec![
                MessagePart::Text {
                    text: prompt.to_string(),
                },
                MessagePart::ImageUrl {
                    image_url: ImageUrl {
                        url: format!("data:{mime_type};base64,{b64}"),
                    },
                },
            ],
        }
    }

    /// Asks the model to describe one image.
    ///
    /// Without a configured credential this returns
    /// [`VisionError::MissingCredential`] before any request is made.
    #[instrument(skip(self, image), fields(model = %self.model, image_bytes = image.len()))]
    pub async fn describe_image(&self, prompt: &str, image: &[u8]) -> VisionResult<String> {
        let msg = Self::prepare_message(prompt, image);
        self.call(vec![msg]).await
    }

    pub async fn call(&self, messages: Vec<Message>) -> VisionResult<String> {
        let Some(api_key) = &self.api_key else {
            return Err(VisionError::MissingCredential);
        };
        let req_body = self.build_request(messages);
        let url = format!("{}{CHAT_COMPLETIONS_PATH}", self.base_url);

        info!("Sending request to vision backend");
        let response = self
            .http
            .post(url)
            .bearer_auth(api_key)
            .timeout(self.config.timeout)
            .json(&req_body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Vision backend error {}: {}", status.as_u16(), body);
            return Err(VisionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        Ok(extract_content(body))
    }

    fn build_request(&self, messages: Vec<Message>) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }
}

/// Reads the first choice's content. An envelope without choices is returned raw.
fn extract_content(body: Value) -> String {
    match serde_json::from_value::<ChatFullResponse>(body.clone()) {
        Ok(full) if !full.choices.is_empty() => {
            let content = full
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .unwrap_or_default();
            info!("Vision backend success, length: {}", content.chars().count());
            content
        }
        _ => {
            warn!("Unexpected response format: {body}");
            body.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::Result;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    fn client(server: &MockServer, api_key: Option<&str>) -> VisionClient {
        VisionClient::with_base_url(&server.uri())
            .maybe_api_key(api_key.map(str::to_string))
            .max_tokens(512)
            .temperature(0.7)
            .timeout(Duration::from_secs(5))
            .build()
    }

    #[tokio::test]
    async fn returns_first_choice_content() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_COMPLETIONS_PATH))
            .and(header("authorization", "Bearer test-token"))
            .and(body_partial_json(json!({
                "model": DEFAULT_MODEL,
                "max_tokens": 512,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "A dog runs in the park. It is happy."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client(&server, Some("test-token"))
            .describe_image("Describe this image in detail.", JPEG_MAGIC)
            .await?;
        assert_eq!(text, "A dog runs in the park. It is happy.");
        Ok(())
    }

    #[tokio::test]
    async fn missing_credential_skips_the_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server, None)
            .describe_image("Describe this image in detail.", JPEG_MAGIC)
            .await
            .expect_err("no credential configured");
        assert!(matches!(err, VisionError::MissingCredential));
        assert_eq!(err.soft_fail_marker(), "Error: HF_API_TOKEN not configured.");
    }

    #[tokio::test]
    async fn error_status_becomes_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("model is loading"))
            .mount(&server)
            .await;

        let err = client(&server, Some("test-token"))
            .describe_image("Describe this image in detail.", JPEG_MAGIC)
            .await
            .expect_err("backend returned 503");
        assert!(matches!(err, VisionError::Api { status: 503, .. }));
        assert_eq!(err.soft_fail_marker(), "Error: 503 - model is loading");
    }

    #[tokio::test]
    async fn unexpected_envelope_is_returned_raw() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CHAT_COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"generated_text": "hi"})))
            .mount(&server)
            .await;

        let text = client(&server, Some("test-token"))
            .describe_image("Describe this image in detail.", JPEG_MAGIC)
            .await?;
        assert_eq!(text, r#"{"generated_text":"hi"}"#);
        Ok(())
    }

    #[test]
    fn message_embeds_image_as_data_uri() -> Result<()> {
        let msg = VisionClient::prepare_message("Describe this image in detail.", JPEG_MAGIC);
        let value = serde_json::to_value(&msg)?;

        assert_eq!(value["role"], json!("user"));
        assert_eq!(value["content"][0], json!({"type": "text", "text": "Describe this image in detail."}));
        assert_eq!(value["content"][1]["type"], json!("image_url"));
        let url = value["content"][1]["image_url"]["url"]
            .as_str()
            .unwrap_or_default();
        assert!(url.starts_with("data:image/jpeg;base64,"));
        Ok(())
    }
}
