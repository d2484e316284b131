//! Ingestion pipeline — binary entrypoint.
//! Fetches the news feed for every configured ticker and persists what is
//! new. Invoked directly or from an external cron; no flags.

use anyhow::Result;

use ticker_news_sentinel::config::{self, StoreBackend};
use ticker_news_sentinel::feed::yahoo::YahooFeed;
use ticker_news_sentinel::pipeline::run_ingest;
use ticker_news_sentinel::store;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    config::init_tracing();

    let backend = StoreBackend::from_env()?;
    let shared = store::open(&backend).await?;
    let tickers = config::load_tickers_default()?;
    let feed = YahooFeed::new();

    let report = run_ingest(&feed, shared.as_ref(), &tickers).await?;
    println!(
        "Finished: {} new articles stored, {} duplicates skipped, {} tickers failed.",
        report.inserted,
        report.duplicates,
        report.failed_tickers.len()
    );
    Ok(())
}
