// src/model/mod.rs
//! Model boundary: provider abstraction, the fixed prompt, and reply parsing.

pub mod gemini;
pub mod paced;

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::record::Sentiment;

/// What the model hands back for one headline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub sentiment: Sentiment,
    pub summary: String,
}

/// Trait object used by the enrichment pipeline and tests.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn classify(&self, ticker: &str, headline: &str) -> Result<Verdict>;
    fn name(&self) -> &'static str;
}

/// The fixed prompt. The JSON shape and the three allowed labels are
/// instruction-enforced only; `parse_verdict` is the real gate.
pub fn build_prompt(ticker: &str, headline: &str) -> String {
    format!(
        "You are a financial analyst. Analyze this news headline for {ticker}:\n\
         \"{headline}\"\n\n\
         Return a JSON object with exactly these fields:\n\
         {{\n\
             \"sentiment\": \"Positive\" or \"Negative\" or \"Neutral\",\n\
             \"summary\": \"One short sentence explaining the impact.\"\n\
         }}\n\
         Do not use markdown. Return ONLY raw JSON."
    )
}

/// Parse the model's reply into a `Verdict`. Tolerates a stray markdown
/// fence; anything else malformed is an error for the caller to log.
pub fn parse_verdict(reply: &str) -> Result<Verdict> {
    #[derive(Deserialize)]
    struct Raw {
        sentiment: String,
        summary: String,
    }

    let trimmed = strip_code_fence(reply);
    let raw: Raw = serde_json::from_str(trimmed)
        .with_context(|| format!("model reply is not the expected JSON object: {reply:?}"))?;
    let sentiment: Sentiment = raw.sentiment.parse()?;
    Ok(Verdict {
        sentiment,
        summary: raw.summary,
    })
}

fn strip_code_fence(s: &str) -> &str {
    let t = s.trim();
    let t = t
        .strip_prefix("```json")
        .or_else(|| t.strip_prefix("```"))
        .unwrap_or(t);
    t.strip_suffix("```").unwrap_or(t).trim()
}

/// Deterministic client for tests and offline runs: fixed verdict, call
/// counter, optional failure for headlines containing a marker substring.
pub struct MockModel {
    pub verdict: Verdict,
    pub fail_on: Option<String>,
    calls: AtomicUsize,
}

impl MockModel {
    pub fn returning(verdict: Verdict) -> Self {
        Self {
            verdict,
            fail_on: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelClient for MockModel {
    async fn classify(&self, _ticker: &str, headline: &str) -> Result<Verdict> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(marker) = &self.fail_on {
            if headline.contains(marker.as_str()) {
                anyhow::bail!("mock model refused headline {headline:?}");
            }
        }
        Ok(self.verdict.clone())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
