// tests/e2e_scenario.rs
//
// Full ingest -> enrich -> re-ingest round over one raw item, exercising the
// real pipelines with a mock feed and a mock model.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use ticker_news_sentinel::feed::NewsFeed;
use ticker_news_sentinel::model::{MockModel, Verdict};
use ticker_news_sentinel::pipeline::{run_enrich, run_ingest, DEFAULT_BATCH_LIMIT};
use ticker_news_sentinel::record::Sentiment;
use ticker_news_sentinel::store::sqlite::SqliteStore;
use ticker_news_sentinel::store::Store;

struct OneItemFeed;

#[async_trait]
impl NewsFeed for OneItemFeed {
    async fn fetch(&self, _ticker: &str) -> Result<Vec<Value>> {
        Ok(vec![json!({
            "title": "X Corp beats earnings",
            "content": {
                "title": "X Corp beats earnings",
                "provider": { "displayName": "Reuters" }
            }
        })])
    }
    fn name(&self) -> &'static str {
        "fixture"
    }
}

#[tokio::test]
async fn ingest_enrich_reingest_round_trip() {
    let store = SqliteStore::open_in_memory().unwrap();
    let tickers = vec!["XCO".to_string()];

    // Ingest: one record, awaiting enrichment.
    let ingested = run_ingest(&OneItemFeed, &store, &tickers).await.unwrap();
    assert_eq!(ingested.inserted, 1);
    let all = store.select_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].ticker, "XCO");
    assert_eq!(all[0].title, "X Corp beats earnings");
    assert_eq!(all[0].publisher, "Reuters");
    assert!(all[0].is_unannotated());

    // Enrich with a model that answers a fixed positive verdict.
    let model = MockModel::returning(Verdict {
        sentiment: Sentiment::Positive,
        summary: "Earnings beat boosts outlook.".to_string(),
    });
    let enriched = run_enrich(&store, &model, DEFAULT_BATCH_LIMIT).await.unwrap();
    assert_eq!(enriched.enriched, 1);

    let row = store.select_all().await.unwrap().remove(0);
    assert_eq!(row.sentiment, Some(Sentiment::Positive));
    assert_eq!(row.ai_summary.as_deref(), Some("Earnings beat boosts outlook."));

    // Re-ingest the same raw item: zero new records.
    let again = run_ingest(&OneItemFeed, &store, &tickers).await.unwrap();
    assert_eq!(again.inserted, 0);
    assert_eq!(again.duplicates, 1);
    assert_eq!(store.select_all().await.unwrap().len(), 1);
}
