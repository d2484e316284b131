//! Enrichment pipeline — binary entrypoint.
//! Annotates up to one batch of stored headlines with a Gemini verdict.
//! Re-run (manually or from cron) until it reports nothing to do.

use anyhow::Result;

use ticker_news_sentinel::config::{self, StoreBackend};
use ticker_news_sentinel::model::gemini::GeminiClient;
use ticker_news_sentinel::model::paced::PacedClient;
use ticker_news_sentinel::pipeline::{run_enrich, DEFAULT_BATCH_LIMIT};
use ticker_news_sentinel::store;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    config::init_tracing();

    let api_key = config::gemini_api_key()?;
    let backend = StoreBackend::from_env()?;
    let shared = store::open(&backend).await?;

    let model = PacedClient::with_default_interval(GeminiClient::new(api_key, None));
    let report = run_enrich(shared.as_ref(), &model, DEFAULT_BATCH_LIMIT).await?;
    if report.selected == 0 {
        println!("All news is already analyzed. No work to do.");
    } else {
        println!(
            "Analysis batch complete: {} enriched, {} failed out of {} selected.",
            report.enriched, report.failed, report.selected
        );
    }
    Ok(())
}
