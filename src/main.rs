//! Service entry point: load configuration, wire the store, serve

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use book_catalog::config::ApiConfig;
use book_catalog::server::{AppState, build_router};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::var("CONFIG_FILE") {
        Ok(path) => ApiConfig::from_yaml_file(&path)?,
        Err(_) => ApiConfig::default(),
    }
    .with_env_overrides();

    let state = AppState::in_memory(&config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "book catalog listening");
    axum::serve(listener, app).await?;

    Ok(())
}
