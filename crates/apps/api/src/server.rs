use crate::api_state::ApiContext;
use crate::create_router;
use app_state::AppSettings;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use http::{HeaderValue, header};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::cors;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

pub async fn serve(settings: AppSettings) -> Result<()> {
    // --- Server Startup ---
    info!("🚀 Initializing server...");
    if !settings.has_api_token() {
        warn!("HF_API_TOKEN not found, captions will carry an error marker until it is set.");
    }

    let addr: SocketAddr = format!("{}:{}", settings.api.host, settings.api.port)
        .parse()
        .map_err(|e| eyre!("Invalid address: {}", e))?;
    let listener = TcpListener::bind(addr).await?;
    info!("🐸 Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_app(ApiContext::new(settings))).await?;
    Ok(())
}

/// Router with every route plus the CORS, compression, trace and body limit layers.
pub fn build_app(api_state: ApiContext) -> Router {
    let settings = &api_state.settings.api;

    // --- CORS Configuration ---
    let cors = if settings.allowed_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new().allow_origin(cors::Any)
    } else {
        let allowed_origins: Vec<HeaderValue> = settings
            .allowed_origins
            .iter()
            .filter_map(|s| match s.parse() {
                Ok(hv) => Some(hv),
                Err(e) => {
                    error!("Invalid CORS origin configured: {} - Error: {}", s, e);
                    None
                }
            })
            .collect();
        CorsLayer::new().allow_origin(allowed_origins)
    }
    .allow_methods(cors::Any)
    .allow_headers([
        header::CONTENT_TYPE,
        header::ACCEPT,
        header::ORIGIN,
        header::USER_AGENT,
        header::CACHE_CONTROL,
    ]);

    let body_limit = settings.max_upload_bytes;

    // --- Create Router ---
    create_router(api_state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http().on_request(()))
        .layer(cors)
        .layer(CompressionLayer::new())
}
