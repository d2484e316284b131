// src/model/gemini.rs
//! Gemini provider (generateContent API). Requires `GEMINI_API_KEY`. The
//! request asks for `application/json` output, so a well-behaved model reply
//! is already the bare verdict object.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{build_prompt, parse_verdict, ModelClient, Verdict};

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// `model_override`: pass Some("gemini-2.0-flash") to override; the
    /// `GEMINI_MODEL` env var wins over the built-in default.
    pub fn new(api_key: String, model_override: Option<&str>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("ticker-news-sentinel/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client");
        let model = model_override
            .map(|m| m.to_string())
            .or_else(|| std::env::var("GEMINI_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Self {
            http,
            api_key,
            model,
        }
    }
}

#[derive(Serialize)]
struct Req<'a> {
    contents: Vec<ReqContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig<'a>,
}
#[derive(Serialize)]
struct ReqContent<'a> {
    parts: Vec<Part<'a>>,
}
#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}
#[derive(Serialize)]
struct GenerationConfig<'a> {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'a str,
}

#[derive(Deserialize)]
struct Resp {
    candidates: Vec<Candidate>,
}
#[derive(Deserialize)]
struct Candidate {
    content: RespContent,
}
#[derive(Deserialize)]
struct RespContent {
    parts: Vec<RespPart>,
}
#[derive(Deserialize)]
struct RespPart {
    text: String,
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn classify(&self, ticker: &str, headline: &str) -> Result<Verdict> {
        let prompt = build_prompt(ticker, headline);
        let req = Req {
            contents: vec![ReqContent {
                parts: vec![Part { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                // Forces JSON output.
                response_mime_type: "application/json",
            },
        };

        let url = format!("{API_BASE}/{}:generateContent", self.model);
        let resp = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&req)
            .send()
            .await
            .context("calling gemini generateContent")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("gemini answered {status}: {text}"));
        }

        let body: Resp = resp.json().await.context("decoding gemini response")?;
        let text = body
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| anyhow!("gemini response carried no candidate text"))?;
        parse_verdict(text)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
