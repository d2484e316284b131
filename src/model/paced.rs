// src/model/paced.rs
//! Rate accommodation at the client boundary. Wraps any `ModelClient` and
//! enforces a minimum interval between calls, so the pipeline loop stays
//! free of sleep bookkeeping.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::model::{ModelClient, Verdict};

pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(1);

pub struct PacedClient<C: ModelClient> {
    inner: C,
    min_interval: Duration,
    // Holding the lock across the call also serializes concurrent callers.
    last_call: Mutex<Option<Instant>>,
}

impl<C: ModelClient> PacedClient<C> {
    pub fn new(inner: C, min_interval: Duration) -> Self {
        Self {
            inner,
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    pub fn with_default_interval(inner: C) -> Self {
        Self::new(inner, DEFAULT_MIN_INTERVAL)
    }
}

#[async_trait]
impl<C: ModelClient> ModelClient for PacedClient<C> {
    async fn classify(&self, ticker: &str, headline: &str) -> Result<Verdict> {
        let mut last = self.last_call.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        let out = self.inner.classify(ticker, headline).await;
        *last = Some(Instant::now());
        out
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MockModel;
    use crate::record::Sentiment;

    #[tokio::test]
    async fn second_call_waits_out_the_interval() {
        let mock = MockModel::returning(Verdict {
            sentiment: Sentiment::Neutral,
            summary: "Flat.".into(),
        });
        let paced = PacedClient::new(mock, Duration::from_millis(50));

        let t0 = Instant::now();
        paced.classify("TSLA", "a").await.unwrap();
        paced.classify("TSLA", "b").await.unwrap();
        assert!(t0.elapsed() >= Duration::from_millis(50));
        assert_eq!(paced.inner.calls(), 2);
    }
}
