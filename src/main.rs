//! Orderdeck server entry point

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use orderdeck::app::{router, AppState};
use orderdeck::cache::{CacheStore, FreshnessPolicy};
use orderdeck::config::Config;
use orderdeck::data::{ApiCache, WcClient};
use orderdeck::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let policy = FreshnessPolicy::from_ttl_secs(config.cache_ttl_secs);
    let store = Arc::new(CacheStore::new(config.cache_dir.clone(), policy)?);
    let client = WcClient::new(&config);
    let api = ApiCache::new(client, Arc::clone(&store));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, cache_dir = %config.cache_dir.display(), "orderdeck listening");

    let app = router(AppState::new(api, store, config));
    axum::serve(listener, app).await?;

    Ok(())
}
