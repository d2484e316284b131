//! Dashboard server — binary entrypoint.
//! Boots the Axum HTTP server over the configured store. Run the `ingest`
//! and `enrich` binaries (manually or from cron) to feed it.

use anyhow::{Context, Result};
use tracing::info;

use ticker_news_sentinel::api::{self, AppState};
use ticker_news_sentinel::config::{self, StoreBackend};
use ticker_news_sentinel::store;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when the vars come from the environment.
    let _ = dotenvy::dotenv();
    config::init_tracing();

    let backend = StoreBackend::from_env()?;
    let shared = store::open(&backend).await?;
    info!(store = shared.name(), "store ready");

    let router = api::router(AppState { store: shared });

    let addr = std::env::var("DASHBOARD_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding dashboard listener on {addr}"))?;
    info!(%addr, "dashboard listening");
    axum::serve(listener, router)
        .await
        .context("serving dashboard")?;
    Ok(())
}
