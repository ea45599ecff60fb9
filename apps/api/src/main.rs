mod config;
mod errors;
mod llm_client;
mod review;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::build_gateway;
use crate::review::pipeline::ReviewSettings;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values; credentials are checked per request)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV Review API v{}", env!("CARGO_PKG_VERSION"));

    if let Some(variable) = config.missing_credential() {
        warn!("{variable} is not set; review requests will fail with 500 until it is configured");
    }

    // Initialize model gateway
    let gateway = build_gateway(&config)?;
    let settings = ReviewSettings::from(&config);
    info!(
        "Model gateway initialized (provider: {}, mode: {:?}, timeout: {}s, min text: {} chars)",
        gateway.provider(),
        settings.mode,
        settings.timeout.as_secs(),
        settings.min_text_length
    );

    let state = AppState { gateway, settings };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
