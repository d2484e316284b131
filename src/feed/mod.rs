// src/feed/mod.rs
pub mod normalize;
pub mod yahoo;

use anyhow::Result;
use serde_json::Value;

/// A per-ticker headline source. Items come back in whatever shape the
/// upstream uses; `normalize::extract_headline` canonicalizes them.
#[async_trait::async_trait]
pub trait NewsFeed: Send + Sync {
    async fn fetch(&self, ticker: &str) -> Result<Vec<Value>>;
    fn name(&self) -> &'static str;
}
