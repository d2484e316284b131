// tests/api_http.rs
//
// HTTP-level tests for the dashboard Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use ticker_news_sentinel::api::{self, AppState};
use ticker_news_sentinel::record::{NewRecord, Sentiment};
use ticker_news_sentinel::store::sqlite::SqliteStore;
use ticker_news_sentinel::store::Store;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

async fn seeded_router() -> Router {
    let store = SqliteStore::open_in_memory().unwrap();
    let rows = [
        ("TSLA", "Tesla surges", Some(Sentiment::Positive)),
        ("TSLA", "Tesla recalls models", Some(Sentiment::Negative)),
        ("GOOGL", "Google ships new model", Some(Sentiment::Positive)),
        ("BTC-USD", "Bitcoin drifts sideways", Some(Sentiment::Neutral)),
        ("BTC-USD", "Awaiting the verdict", None),
    ];
    for (n, (ticker, title, sentiment)) in rows.iter().enumerate() {
        store
            .insert(&NewRecord {
                ticker: ticker.to_string(),
                title: title.to_string(),
                link: format!("https://news.example/{n}"),
                publisher: "Reuters".to_string(),
                published: "2026-08-29T12:00:00Z".to_string(),
            })
            .await
            .unwrap();
        if let Some(s) = sentiment {
            let id = store.select_all().await.unwrap()[0].id;
            store.update_sentiment(id, *s, "because").await.unwrap();
        }
    }
    api::router(AppState {
        store: Arc::new(store),
    })
}

async fn get_json(app: Router, uri: &str) -> Json {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    let resp = app.oneshot(req).await.expect("oneshot");
    assert_eq!(resp.status(), StatusCode::OK, "GET {uri} should be 200");
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

#[tokio::test]
async fn health_answers_ok() {
    let app = seeded_router().await;
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn stats_counters_match_per_sentiment_counts() {
    let app = seeded_router().await;
    let v = get_json(app, "/api/stats").await;
    assert_eq!(v["total"], 5);
    assert_eq!(v["positive"], 2);
    assert_eq!(v["negative"], 1);
}

#[tokio::test]
async fn news_lists_all_rows_newest_first() {
    let app = seeded_router().await;
    let v = get_json(app, "/api/news").await;
    let rows = v.as_array().expect("array body");
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["title"], "Awaiting the verdict");
    assert!(rows[0]["sentiment"].is_null());
    let ids: Vec<i64> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert!(ids.windows(2).all(|w| w[0] > w[1]));
}

#[tokio::test]
async fn index_serves_the_dashboard_page() {
    let app = seeded_router().await;
    let req = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    for header in ["Stock", "Headline", "AI Verdict", "Why?"] {
        assert!(page.contains(header), "page should relabel column {header}");
    }
}
