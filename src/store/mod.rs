// src/store/mod.rs
pub mod sqlite;
pub mod supabase;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::StoreBackend;
use crate::record::{NewRecord, NewsRecord, Sentiment};

/// Durable, deduplicated storage of news rows. Both backends enforce their
/// dedup key with a uniqueness constraint; `insert` answers `Ok(false)` for
/// a duplicate instead of erroring.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a fresh row with sentiment/summary unset. `false` = duplicate.
    async fn insert(&self, rec: &NewRecord) -> Result<bool>;

    /// Rows still awaiting enrichment, oldest first, at most `limit`.
    async fn select_unannotated(&self, limit: usize) -> Result<Vec<NewsRecord>>;

    /// Fill in the model verdict for one row. Called exactly once per row.
    async fn update_sentiment(&self, id: i64, sentiment: Sentiment, summary: &str) -> Result<()>;

    /// Full table, newest first, for the dashboard.
    async fn select_all(&self) -> Result<Vec<NewsRecord>>;

    fn name(&self) -> &'static str;
}

pub type SharedStore = Arc<dyn Store>;

/// Composition root for the binaries: build the configured backend and make
/// connection problems fatal before any pipeline work starts.
pub async fn open(backend: &StoreBackend) -> Result<SharedStore> {
    match backend {
        StoreBackend::Sqlite { path } => {
            let store = sqlite::SqliteStore::open(path)?;
            Ok(Arc::new(store))
        }
        StoreBackend::Supabase { url, key } => {
            let store = supabase::SupabaseStore::new(url, key)?;
            store.probe().await?;
            Ok(Arc::new(store))
        }
    }
}
