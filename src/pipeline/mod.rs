// src/pipeline/mod.rs
pub mod enrich;
pub mod ingest;

pub use enrich::{run_enrich, EnrichReport, DEFAULT_BATCH_LIMIT};
pub use ingest::{run_ingest, IngestReport};

use metrics::describe_counter;
use once_cell::sync::OnceCell;

/// One-time metrics registration so the series carry descriptions.
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_inserted_total", "News rows newly persisted.");
        describe_counter!("ingest_duplicates_total", "Feed items rejected as duplicates.");
        describe_counter!("ingest_ticker_errors_total", "Per-ticker feed fetch failures.");
        describe_counter!("enrich_enriched_total", "Rows annotated with a model verdict.");
        describe_counter!("enrich_failures_total", "Per-row enrichment failures.");
    });
}
