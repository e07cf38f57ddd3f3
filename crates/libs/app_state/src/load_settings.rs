use crate::{AppSettings, RawSettings};
use color_eyre::eyre::Result;
use std::env;
use std::path::Path;

/// Name of the environment variable the token was historically read from.
pub const LEGACY_TOKEN_VAR: &str = "HF_API_TOKEN";

pub fn load_app_settings() -> Result<AppSettings> {
    load_app_settings_from(Path::new("config/settings.yaml"))
}

pub fn load_app_settings_from(config_path: &Path) -> Result<AppSettings> {
    // Need to load from dotenv so the token can live in `.env`.
    dotenv::from_path(".env").ok();
    load_with_legacy_token(config_path, env::var(LEGACY_TOKEN_VAR).ok())
}

/// A blank legacy token, as in an unfilled `.env`, must not shadow a configured one.
fn load_with_legacy_token(config_path: &Path, legacy_token: Option<String>) -> Result<AppSettings> {
    let config_path = config_path.canonicalize()?;
    let legacy_token = legacy_token.filter(|token| !token.trim().is_empty());

    let builder = config::Config::builder()
        .add_source(config::File::from(config_path))
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option("secrets.hf_api_token", legacy_token)?;

    let raw_settings = builder.build()?.try_deserialize::<RawSettings>()?;
    Ok(raw_settings.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SETTINGS_YAML: &str = r"
api:
  host: 127.0.0.1
  port: 9123
  allowed_origins: []
  max_upload_bytes: 1048576
logging:
  level: info
captioning:
  base_url: http://localhost:8080/
  model: test-model
  model_label: Test
  prompt: Describe this image in detail.
  max_tokens: 64
  temperature: 0.2
  caption_timeout_secs: 5
  fetch_timeout_secs: 3
  max_dimension: 512
  jpeg_quality: 90
  batch_concurrency: 4
history:
  capacity: 10
secrets:
  hf_api_token: '{token}'
";

    fn write_settings(dir: &Path, token: &str) -> Result<std::path::PathBuf> {
        let path = dir.join("settings.yaml");
        fs::write(&path, SETTINGS_YAML.replace("{token}", token))?;
        Ok(path)
    }

    #[test]
    fn loads_settings_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_settings(dir.path(), "")?;

        let settings = load_with_legacy_token(&path, None)?;
        assert_eq!(settings.api.port, 9123);
        assert_eq!(settings.captioning.base_url, "http://localhost:8080");
        assert_eq!(settings.captioning.max_dimension, 512);
        assert_eq!(settings.captioning.batch_concurrency, 4);
        assert_eq!(settings.history.capacity, 10);
        Ok(())
    }

    #[test]
    fn blank_legacy_token_keeps_file_token() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_settings(dir.path(), "hf_from_yaml")?;

        for blank in ["", "   "] {
            let settings = load_with_legacy_token(&path, Some(blank.to_string()))?;
            assert_eq!(settings.secrets.hf_api_token.as_deref(), Some("hf_from_yaml"));
        }
        Ok(())
    }

    #[test]
    fn legacy_token_overrides_file_token() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_settings(dir.path(), "hf_from_yaml")?;

        let settings = load_with_legacy_token(&path, Some("hf_from_env".to_string()))?;
        assert_eq!(settings.secrets.hf_api_token.as_deref(), Some("hf_from_env"));
        Ok(())
    }
}
