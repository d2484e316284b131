// src/pipeline/ingest.rs
//! Ingestion: per configured ticker, fetch the raw feed, canonicalize each
//! item, and attempt insertion. A failing ticker is logged and skipped; the
//! rest of the list still runs.

use anyhow::Result;
use metrics::counter;
use tracing::{info, warn};

use crate::feed::normalize::extract_headline;
use crate::feed::NewsFeed;
use crate::record::NewRecord;
use crate::store::Store;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub inserted: usize,
    pub duplicates: usize,
    pub failed_tickers: Vec<String>,
}

pub async fn run_ingest(
    feed: &dyn NewsFeed,
    store: &dyn Store,
    tickers: &[String],
) -> Result<IngestReport> {
    super::ensure_metrics_described();

    let mut report = IngestReport::default();
    for ticker in tickers {
        let items = match feed.fetch(ticker).await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = ?e, ticker = %ticker, feed = feed.name(), "feed fetch failed");
                counter!("ingest_ticker_errors_total").increment(1);
                report.failed_tickers.push(ticker.clone());
                continue;
            }
        };

        for item in &items {
            let h = extract_headline(item);
            let rec = NewRecord {
                ticker: ticker.clone(),
                title: h.title,
                link: h.link,
                publisher: h.publisher,
                published: h.published,
            };
            match store.insert(&rec).await {
                Ok(true) => {
                    info!(ticker = %ticker, title = %rec.title, "new headline stored");
                    counter!("ingest_inserted_total").increment(1);
                    report.inserted += 1;
                }
                Ok(false) => {
                    counter!("ingest_duplicates_total").increment(1);
                    report.duplicates += 1;
                }
                Err(e) => {
                    warn!(error = ?e, ticker = %ticker, title = %rec.title, "insert failed");
                    counter!("ingest_ticker_errors_total").increment(1);
                }
            }
        }
    }

    info!(
        inserted = report.inserted,
        duplicates = report.duplicates,
        failed_tickers = report.failed_tickers.len(),
        "ingest run finished"
    );
    Ok(report)
}
