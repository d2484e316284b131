// src/config.rs
//! Environment and ticker-list configuration shared by the three binaries.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const ENV_TICKERS_PATH: &str = "TICKERS_PATH";
const ENV_STORE_BACKEND: &str = "STORE_BACKEND";
const ENV_DB_PATH: &str = "NEWS_DB_PATH";
const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
const ENV_SUPABASE_KEY: &str = "SUPABASE_KEY";
const ENV_GEMINI_KEY: &str = "GEMINI_API_KEY";

/// Assets tracked when no tickers file is present.
pub const DEFAULT_TICKERS: &[&str] = &["BTC-USD", "TSLA", "GOOGL"];

/// Which store the pipelines and dashboard talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite { path: PathBuf },
    Supabase { url: String, key: String },
}

impl StoreBackend {
    /// Resolve from `STORE_BACKEND` (`sqlite` default, or `supabase`).
    /// Missing hosted-backend credentials are a fatal startup error.
    pub fn from_env() -> Result<Self> {
        let backend = std::env::var(ENV_STORE_BACKEND)
            .unwrap_or_else(|_| "sqlite".to_string())
            .to_ascii_lowercase();
        match backend.as_str() {
            "sqlite" => {
                let path = std::env::var(ENV_DB_PATH).unwrap_or_else(|_| "news.db".to_string());
                Ok(StoreBackend::Sqlite {
                    path: PathBuf::from(path),
                })
            }
            "supabase" => {
                let url = std::env::var(ENV_SUPABASE_URL).map_err(|_| {
                    anyhow!("missing SUPABASE_URL; set it in the environment or .env")
                })?;
                let key = std::env::var(ENV_SUPABASE_KEY).map_err(|_| {
                    anyhow!("missing SUPABASE_KEY; set it in the environment or .env")
                })?;
                Ok(StoreBackend::Supabase { url, key })
            }
            other => Err(anyhow!(
                "unsupported STORE_BACKEND {other:?} (expected \"sqlite\" or \"supabase\")"
            )),
        }
    }
}

/// Model API key; its absence is fatal for the enrichment binary.
pub fn gemini_api_key() -> Result<String> {
    std::env::var(ENV_GEMINI_KEY)
        .map_err(|_| anyhow!("missing GEMINI_API_KEY; set it in the environment or .env"))
}

/// Compact tracing to stderr, filter from RUST_LOG with an `info` default.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

/// Load the tracked tickers from an explicit path. Supports TOML or JSON.
pub fn load_tickers_from(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading tickers from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_tickers(&content, ext.as_str())
}

/// Load tickers using env var + fallbacks:
/// 1) $TICKERS_PATH
/// 2) config/tickers.toml
/// 3) config/tickers.json
/// 4) built-in default list
pub fn load_tickers_default() -> Result<Vec<String>> {
    if let Ok(p) = std::env::var(ENV_TICKERS_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_tickers_from(&pb);
        } else {
            return Err(anyhow!("TICKERS_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/tickers.toml");
    if toml_p.exists() {
        return load_tickers_from(&toml_p);
    }
    let json_p = PathBuf::from("config/tickers.json");
    if json_p.exists() {
        return load_tickers_from(&json_p);
    }
    Ok(DEFAULT_TICKERS.iter().map(|s| s.to_string()).collect())
}

fn parse_tickers(s: &str, hint_ext: &str) -> Result<Vec<String>> {
    let try_toml = hint_ext == "toml" || s.contains("tickers");
    if try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = parse_json(s) {
        return Ok(v);
    }
    if !try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported tickers format"))
}

fn parse_toml(s: &str) -> Result<Vec<String>> {
    #[derive(serde::Deserialize)]
    struct TomlTickers {
        tickers: Vec<String>,
    }
    let v: TomlTickers = toml::from_str(s)?;
    Ok(clean_list(v.tickers))
}

fn parse_json(s: &str) -> Result<Vec<String>> {
    let v: Vec<String> = serde_json::from_str(s)?;
    Ok(clean_list(v))
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim();
        if !t.is_empty() && !out.iter().any(|s: &String| s == t) {
            out.push(t.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn trim_dedup_and_formats_work() {
        let toml = r#"tickers = [" TSLA ", "", "GOOGL", "GOOGL"]"#;
        let json = r#"["BTC-USD", "  TSLA  ", ""]"#;
        let toml_out = parse_toml(toml).unwrap();
        assert_eq!(toml_out, vec!["TSLA".to_string(), "GOOGL".to_string()]);
        let json_out = parse_json(json).unwrap();
        assert_eq!(json_out, vec!["BTC-USD".to_string(), "TSLA".to_string()]);
    }

    #[test]
    fn clean_list_preserves_configured_order() {
        let out = clean_list(vec!["TSLA".into(), "AAPL".into(), "TSLA".into()]);
        assert_eq!(out, vec!["TSLA".to_string(), "AAPL".to_string()]);
    }

    #[serial_test::serial]
    #[test]
    fn backend_defaults_to_sqlite() {
        env::remove_var(ENV_STORE_BACKEND);
        env::remove_var(ENV_DB_PATH);
        let b = StoreBackend::from_env().unwrap();
        assert_eq!(
            b,
            StoreBackend::Sqlite {
                path: PathBuf::from("news.db")
            }
        );
    }

    #[serial_test::serial]
    #[test]
    fn supabase_backend_requires_both_keys() {
        env::set_var(ENV_STORE_BACKEND, "supabase");
        env::set_var(ENV_SUPABASE_URL, "https://example.supabase.co");
        env::remove_var(ENV_SUPABASE_KEY);
        let err = StoreBackend::from_env().unwrap_err();
        assert!(err.to_string().contains("SUPABASE_KEY"));
        env::remove_var(ENV_STORE_BACKEND);
        env::remove_var(ENV_SUPABASE_URL);
    }

    #[serial_test::serial]
    #[test]
    fn tickers_env_path_has_priority() {
        let tmp = tempfile::tempdir().unwrap();
        let p_json = tmp.path().join("tickers.json");
        fs::write(&p_json, r#"["NVDA"]"#).unwrap();
        env::set_var(ENV_TICKERS_PATH, p_json.display().to_string());
        let v = load_tickers_default().unwrap();
        assert_eq!(v, vec!["NVDA".to_string()]);
        env::remove_var(ENV_TICKERS_PATH);
    }
}
