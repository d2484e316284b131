// src/pipeline/enrich.rs
//! Enrichment: pull a bounded batch of unannotated rows, ask the model for a
//! verdict per row, and write it back. A failed row keeps its NULL sentiment
//! and is naturally re-selected on the next run.

use anyhow::Result;
use metrics::counter;
use tracing::{info, warn};

use crate::model::ModelClient;
use crate::store::Store;

/// Batch bound; keeps one run inside the free-plan rate budget.
pub const DEFAULT_BATCH_LIMIT: usize = 5;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct EnrichReport {
    pub selected: usize,
    pub enriched: usize,
    pub failed: usize,
}

pub async fn run_enrich(
    store: &dyn Store,
    model: &dyn ModelClient,
    batch_limit: usize,
) -> Result<EnrichReport> {
    super::ensure_metrics_described();

    let rows = store.select_unannotated(batch_limit).await?;
    if rows.is_empty() {
        info!("all news is already analyzed, nothing to do");
        return Ok(EnrichReport::default());
    }

    info!(count = rows.len(), model = model.name(), "analyzing batch");
    let mut report = EnrichReport {
        selected: rows.len(),
        ..Default::default()
    };

    for row in &rows {
        let verdict = match model.classify(&row.ticker, &row.title).await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = ?e, id = row.id, ticker = %row.ticker, "model call failed");
                counter!("enrich_failures_total").increment(1);
                report.failed += 1;
                continue;
            }
        };
        match store
            .update_sentiment(row.id, verdict.sentiment, &verdict.summary)
            .await
        {
            Ok(()) => {
                info!(
                    id = row.id,
                    ticker = %row.ticker,
                    verdict = %verdict.sentiment,
                    summary = %verdict.summary,
                    "row annotated"
                );
                counter!("enrich_enriched_total").increment(1);
                report.enriched += 1;
            }
            Err(e) => {
                warn!(error = ?e, id = row.id, "writing verdict failed");
                counter!("enrich_failures_total").increment(1);
                report.failed += 1;
            }
        }
    }

    info!(
        selected = report.selected,
        enriched = report.enriched,
        failed = report.failed,
        "analysis batch complete"
    );
    Ok(report)
}
