//! pin-api server binary.

use std::sync::Arc;

use anyhow::Context;
use pin_api::config::ApiConfig;
use pin_api::state::AppState;
use pin_ipfs::IpfsApi;
use pin_store::RecordStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ApiConfig::from_env();

    let store = RecordStore::open(config.metadata_dir())
        .await
        .context("failed to open record store")?;
    let uploads_dir = config.uploads_dir();
    tokio::fs::create_dir_all(&uploads_dir)
        .await
        .with_context(|| format!("failed to create uploads dir {}", uploads_dir.display()))?;

    let storage = Arc::new(IpfsApi::new(config.ipfs.clone()));
    let state = AppState::new(Arc::new(store), storage, uploads_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(
        bind = %config.bind_addr,
        ipfs = %config.ipfs.api_url,
        data_dir = %config.data_dir.display(),
        "pin-api listening"
    );

    axum::serve(listener, pin_api::app(state))
        .await
        .context("server error")?;
    Ok(())
}
