// src/store/sqlite.rs
//! Embedded backend. A single `news` table; the UNIQUE constraint on `link`
//! is the dedup key. The sentiment columns arrive via an idempotent upgrade
//! step so databases created before enrichment existed keep working.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection};

use crate::record::{NewRecord, NewsRecord, Sentiment};
use crate::store::Store;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).with_context(|| {
            format!("opening sqlite database at {}", path.as_ref().display())
        })?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database, used by tests and throwaway runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("opening in-memory sqlite")?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS news (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ticker TEXT NOT NULL,
                title TEXT NOT NULL,
                link TEXT UNIQUE,
                publisher TEXT,
                published TEXT
            )",
            [],
        )
        .context("creating news table")?;
        // Upgrade path for pre-enrichment databases.
        add_column_if_missing(conn, "ALTER TABLE news ADD COLUMN sentiment TEXT")?;
        add_column_if_missing(conn, "ALTER TABLE news ADD COLUMN ai_summary TEXT")?;
        Ok(())
    }
}

fn add_column_if_missing(conn: &Connection, ddl: &str) -> Result<()> {
    match conn.execute(ddl, []) {
        Ok(_) => Ok(()),
        Err(e) if e.to_string().contains("duplicate column name") => Ok(()),
        Err(e) => Err(e).with_context(|| format!("running schema upgrade: {ddl}")),
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<NewsRecord> {
    let sentiment: Option<String> = row.get("sentiment")?;
    Ok(NewsRecord {
        id: row.get("id")?,
        ticker: row.get("ticker")?,
        title: row.get("title")?,
        link: row.get::<_, Option<String>>("link")?.unwrap_or_default(),
        publisher: row
            .get::<_, Option<String>>("publisher")?
            .unwrap_or_default(),
        published: row
            .get::<_, Option<String>>("published")?
            .unwrap_or_default(),
        sentiment: sentiment.and_then(|s| s.parse::<Sentiment>().ok()),
        ai_summary: row.get("ai_summary")?,
    })
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert(&self, rec: &NewRecord) -> Result<bool> {
        let conn = self.conn.lock().expect("poisoned sqlite lock");
        let res = conn.execute(
            "INSERT INTO news (ticker, title, link, publisher, published)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![rec.ticker, rec.title, rec.link, rec.publisher, rec.published],
        );
        match res {
            Ok(_) => Ok(true),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Ok(false)
            }
            Err(e) => Err(e).context("inserting news row"),
        }
    }

    async fn select_unannotated(&self, limit: usize) -> Result<Vec<NewsRecord>> {
        let conn = self.conn.lock().expect("poisoned sqlite lock");
        let mut stmt = conn
            .prepare(
                "SELECT id, ticker, title, link, publisher, published, sentiment, ai_summary
                 FROM news WHERE sentiment IS NULL ORDER BY id ASC LIMIT ?1",
            )
            .context("preparing unannotated select")?;
        let rows = stmt
            .query_map(params![limit as i64], row_to_record)
            .context("selecting unannotated rows")?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r.context("decoding unannotated row")?);
        }
        Ok(out)
    }

    async fn update_sentiment(&self, id: i64, sentiment: Sentiment, summary: &str) -> Result<()> {
        let conn = self.conn.lock().expect("poisoned sqlite lock");
        let changed = conn
            .execute(
                "UPDATE news SET sentiment = ?1, ai_summary = ?2 WHERE id = ?3",
                params![sentiment.to_string(), summary, id],
            )
            .with_context(|| format!("updating sentiment for row {id}"))?;
        if changed == 0 {
            anyhow::bail!("no news row with id {id}");
        }
        Ok(())
    }

    async fn select_all(&self) -> Result<Vec<NewsRecord>> {
        let conn = self.conn.lock().expect("poisoned sqlite lock");
        let mut stmt = conn
            .prepare(
                "SELECT id, ticker, title, link, publisher, published, sentiment, ai_summary
                 FROM news ORDER BY id DESC",
            )
            .context("preparing full select")?;
        let rows = stmt
            .query_map([], row_to_record)
            .context("selecting all rows")?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r.context("decoding news row")?);
        }
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}
