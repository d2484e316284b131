// src/feed/yahoo.rs
//! Yahoo Finance search feed. One GET per ticker; the `news` array of the
//! response body is returned as-is and canonicalized later.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::feed::NewsFeed;

const SEARCH_URL: &str = "https://query1.finance.yahoo.com/v1/finance/search";
const DEFAULT_NEWS_COUNT: usize = 10;

pub struct YahooFeed {
    http: reqwest::Client,
    news_count: usize,
}

impl YahooFeed {
    pub fn new() -> Self {
        Self::with_news_count(DEFAULT_NEWS_COUNT)
    }

    pub fn with_news_count(news_count: usize) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) ticker-news-sentinel/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client");
        Self { http, news_count }
    }
}

impl Default for YahooFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NewsFeed for YahooFeed {
    async fn fetch(&self, ticker: &str) -> Result<Vec<Value>> {
        let news_count = self.news_count.to_string();
        let resp = self
            .http
            .get(SEARCH_URL)
            .query(&[
                ("q", ticker),
                ("newsCount", news_count.as_str()),
                ("quotesCount", "0"),
            ])
            .send()
            .await
            .with_context(|| format!("fetching news feed for {ticker}"))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("news feed for {ticker} answered {status}");
        }

        let body: Value = resp
            .json()
            .await
            .with_context(|| format!("decoding news feed body for {ticker}"))?;
        let items = body
            .get("news")
            .and_then(|n| n.as_array())
            .cloned()
            .unwrap_or_default();
        Ok(items)
    }

    fn name(&self) -> &'static str {
        "yahoo"
    }
}
