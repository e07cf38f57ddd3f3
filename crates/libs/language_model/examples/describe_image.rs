#![allow(clippy::missing_errors_doc)]

use color_eyre::eyre::{Result, eyre};
use language_model::VisionClient;
use std::env;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub async fn run() -> Result<()> {
    let image_path = env::args()
        .nth(1)
        .ok_or_else(|| eyre!("usage: describe_image <image.jpg>"))?;
    let client = VisionClient::with_base_url("https://router.huggingface.co")
        .maybe_api_key(env::var("HF_API_TOKEN").ok())
        .build();
    let prompt = "Describe this image in detail.";
    let image = tokio::fs::read(&image_path).await?;

    let now = Instant::now();
    info!("Caption: {}", client.describe_image(prompt, &image).await?);
    info!("Total time for [API]: {:?}", now.elapsed());

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    color_eyre::install()?;

    run().await?;

    Ok(())
}
