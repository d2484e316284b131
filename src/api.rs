// src/api.rs
//! Read-only dashboard: an embedded HTML page over two JSON endpoints.
//! Every load is a full read of the store; there is no incremental update.

use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::record::{NewsRecord, Sentiment};
use crate::store::SharedStore;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(|| async { "ok" }))
        .route("/api/news", get(api_news))
        .route("/api/stats", get(api_stats))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

type ApiError = (StatusCode, &'static str);

fn load_failed(e: anyhow::Error) -> ApiError {
    tracing::error!(error = ?e, "dashboard load failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "load failed")
}

async fn api_news(State(state): State<AppState>) -> Result<Json<Vec<NewsRecord>>, ApiError> {
    let rows = state.store.select_all().await.map_err(load_failed)?;
    Ok(Json(rows))
}

#[derive(serde::Serialize, Debug, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
}

pub fn compute_stats(rows: &[NewsRecord]) -> Stats {
    Stats {
        total: rows.len(),
        positive: rows
            .iter()
            .filter(|r| r.sentiment == Some(Sentiment::Positive))
            .count(),
        negative: rows
            .iter()
            .filter(|r| r.sentiment == Some(Sentiment::Negative))
            .count(),
    }
}

async fn api_stats(State(state): State<AppState>) -> Result<Json<Stats>, ApiError> {
    let rows = state.store.select_all().await.map_err(load_failed)?;
    Ok(Json(compute_stats(&rows)))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>AI Financial Dashboard</title>
<style>
  body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 72rem; color: #222; }
  h1 { font-size: 1.5rem; }
  .cards { display: flex; gap: 1rem; margin: 1rem 0; }
  .card { border: 1px solid #ddd; border-radius: 8px; padding: 1rem 1.5rem; min-width: 10rem; }
  .card .num { font-size: 1.8rem; font-weight: 600; }
  table { border-collapse: collapse; width: 100%; }
  th, td { text-align: left; padding: 0.4rem 0.6rem; border-bottom: 1px solid #eee; }
  .err { color: #b00; }
  button { padding: 0.4rem 1rem; }
</style>
</head>
<body>
<h1>AI Financial Dashboard</h1>
<p>Live sentiment analysis of financial news.</p>
<button onclick="load()">Refresh</button>
<div class="cards">
  <div class="card">Total Articles<div class="num" id="total">-</div></div>
  <div class="card">Positive Signals<div class="num" id="positive">-</div></div>
  <div class="card">Negative Signals<div class="num" id="negative">-</div></div>
</div>
<table>
  <thead><tr><th>Stock</th><th>Headline</th><th>AI Verdict</th><th>Why?</th></tr></thead>
  <tbody id="rows"></tbody>
</table>
<p class="err" id="err"></p>
<script>
async function load() {
  const err = document.getElementById('err');
  err.textContent = '';
  try {
    const [stats, news] = await Promise.all([
      fetch('/api/stats').then(r => { if (!r.ok) throw new Error(); return r.json(); }),
      fetch('/api/news').then(r => { if (!r.ok) throw new Error(); return r.json(); }),
    ]);
    for (const k of ['total', 'positive', 'negative'])
      document.getElementById(k).textContent = stats[k];
    const tbody = document.getElementById('rows');
    tbody.replaceChildren(...news.map(row => {
      const tr = document.createElement('tr');
      for (const v of [row.ticker, row.title, row.sentiment ?? '…', row.ai_summary ?? '']) {
        const td = document.createElement('td');
        td.textContent = v;
        tr.appendChild(td);
      }
      return tr;
    }));
  } catch (_) {
    err.textContent = 'load failed';
  }
}
load();
</script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: i64, sentiment: Option<Sentiment>) -> NewsRecord {
        NewsRecord {
            id,
            ticker: "TSLA".into(),
            title: format!("headline {id}"),
            link: String::new(),
            publisher: String::new(),
            published: String::new(),
            sentiment,
            ai_summary: sentiment.map(|_| "because".to_string()),
        }
    }

    #[test]
    fn stats_count_exact_sentiment_matches() {
        let rows = vec![
            rec(1, Some(Sentiment::Positive)),
            rec(2, Some(Sentiment::Positive)),
            rec(3, Some(Sentiment::Negative)),
            rec(4, Some(Sentiment::Neutral)),
            rec(5, None),
        ];
        let s = compute_stats(&rows);
        assert_eq!(
            s,
            Stats {
                total: 5,
                positive: 2,
                negative: 1
            }
        );
    }
}
