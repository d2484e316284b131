// src/store/supabase.rs
//! Hosted backend speaking PostgREST. The cloud table tracks only
//! `id, ticker, title, sentiment, ai_summary`; dedup is the table's unique
//! constraint on `title`, surfaced to us as HTTP 409. A read-then-insert
//! check would race under concurrent ingestors, so we deliberately lean on
//! the constraint instead.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::record::{NewRecord, NewsRecord, Sentiment};
use crate::store::Store;

const TABLE: &str = "news";

pub struct SupabaseStore {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Row {
    id: i64,
    ticker: String,
    title: String,
    sentiment: Option<Sentiment>,
    ai_summary: Option<String>,
}

impl From<Row> for NewsRecord {
    fn from(r: Row) -> Self {
        NewsRecord {
            id: r.id,
            ticker: r.ticker,
            title: r.title,
            // Not tracked by the cloud table.
            link: String::new(),
            publisher: String::new(),
            published: String::new(),
            sentiment: r.sentiment,
            ai_summary: r.ai_summary,
        }
    }
}

/// Duplicate-key violations come back from PostgREST as 409 Conflict.
fn is_duplicate_status(status: StatusCode) -> bool {
    status == StatusCode::CONFLICT
}

impl SupabaseStore {
    pub fn new(url: &str, key: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut apikey =
            HeaderValue::from_str(key).context("SUPABASE_KEY is not a valid header value")?;
        apikey.set_sensitive(true);
        headers.insert("apikey", apikey);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .context("SUPABASE_KEY is not a valid header value")?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(10))
            .build()
            .context("building supabase http client")?;

        Ok(Self {
            http,
            base_url: format!("{}/rest/v1/{TABLE}", url.trim_end_matches('/')),
        })
    }

    /// Cheap read so bad credentials fail at startup, not mid-pipeline.
    pub async fn probe(&self) -> Result<()> {
        let resp = self
            .http
            .get(&self.base_url)
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await
            .context("supabase startup probe")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("supabase startup probe answered {status}: {body}"));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for SupabaseStore {
    async fn insert(&self, rec: &NewRecord) -> Result<bool> {
        let body = json!({
            "ticker": rec.ticker,
            "title": rec.title,
            "sentiment": null,
            "ai_summary": null,
        });
        let resp = self
            .http
            .post(&self.base_url)
            .header("Prefer", "return=minimal")
            .json(&body)
            .send()
            .await
            .context("supabase insert")?;
        let status = resp.status();
        if status.is_success() {
            return Ok(true);
        }
        if is_duplicate_status(status) {
            return Ok(false);
        }
        let text = resp.text().await.unwrap_or_default();
        Err(anyhow!("supabase insert answered {status}: {text}"))
    }

    async fn select_unannotated(&self, limit: usize) -> Result<Vec<NewsRecord>> {
        let limit = limit.to_string();
        let resp = self
            .http
            .get(&self.base_url)
            .query(&[
                ("select", "id,ticker,title,sentiment,ai_summary"),
                ("sentiment", "is.null"),
                ("order", "id.asc"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .context("supabase unannotated select")?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("supabase select answered {status}: {text}"));
        }
        let rows: Vec<Row> = resp.json().await.context("decoding supabase rows")?;
        Ok(rows.into_iter().map(NewsRecord::from).collect())
    }

    async fn update_sentiment(&self, id: i64, sentiment: Sentiment, summary: &str) -> Result<()> {
        let body = json!({
            "sentiment": sentiment.to_string(),
            "ai_summary": summary,
        });
        let resp = self
            .http
            .patch(&self.base_url)
            .query(&[("id", format!("eq.{id}").as_str())])
            .header("Prefer", "return=minimal")
            .json(&body)
            .send()
            .await
            .with_context(|| format!("supabase update for row {id}"))?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("supabase update for row {id} answered {status}: {text}"));
        }
        Ok(())
    }

    async fn select_all(&self) -> Result<Vec<NewsRecord>> {
        let resp = self
            .http
            .get(&self.base_url)
            .query(&[
                ("select", "id,ticker,title,sentiment,ai_summary"),
                ("order", "id.desc"),
            ])
            .send()
            .await
            .context("supabase full select")?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("supabase select answered {status}: {text}"));
        }
        let rows: Vec<Row> = resp.json().await.context("decoding supabase rows")?;
        Ok(rows.into_iter().map(NewsRecord::from).collect())
    }

    fn name(&self) -> &'static str {
        "supabase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_duplicate() {
        assert!(is_duplicate_status(StatusCode::CONFLICT));
        assert!(!is_duplicate_status(StatusCode::CREATED));
        assert!(!is_duplicate_status(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn rows_decode_with_and_without_verdict() {
        let body = r#"[
            {"id": 1, "ticker": "TSLA", "title": "a", "sentiment": null, "ai_summary": null},
            {"id": 2, "ticker": "TSLA", "title": "b", "sentiment": "Positive", "ai_summary": "up"}
        ]"#;
        let rows: Vec<Row> = serde_json::from_str(body).unwrap();
        let recs: Vec<NewsRecord> = rows.into_iter().map(NewsRecord::from).collect();
        assert!(recs[0].is_unannotated());
        assert_eq!(recs[1].sentiment, Some(Sentiment::Positive));
        assert_eq!(recs[1].ai_summary.as_deref(), Some("up"));
    }
}
