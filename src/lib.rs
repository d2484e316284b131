// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod feed;
pub mod model;
pub mod pipeline;
pub mod record;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::pipeline::{run_enrich, run_ingest, EnrichReport, IngestReport};
pub use crate::record::{NewRecord, NewsRecord, Sentiment};
pub use crate::store::{SharedStore, Store};
