//! # trendline-api: Binary Entry Point
//!
//! Starts the Axum HTTP server for the Trendline API.
//! Configuration comes from the environment (see [`AppConfig::from_env`]).

use trendline_api::state::{AppConfig, AppState, LogFormat};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    // Initialize structured tracing.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::debug!(?config, "configuration loaded");

    // Initialize database pool (optional: absent means in-memory only).
    let db_pool = trendline_api::db::init_pool(config.database_url.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("Database initialization failed: {e}");
            e
        })?;

    if config.static_dir.is_none() {
        tracing::warn!("TRENDLINE_STATIC_DIR not set: only the API is served");
    }

    let port = config.port;
    let state = AppState::with_config(config, db_pool);
    tracing::info!(backend = state.projects.backend().kind(), "project store ready");

    let app = trendline_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Trendline API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
