// src/record.rs
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Three-valued verdict the model assigns to a headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl FromStr for Sentiment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            other => anyhow::bail!("unrecognized sentiment label: {other:?}"),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        };
        f.write_str(s)
    }
}

/// A persisted news row. Core fields are fixed at insert time; only
/// `sentiment` and `ai_summary` are ever written afterwards, exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsRecord {
    pub id: i64,
    pub ticker: String,
    pub title: String,
    /// Hosted backend does not track these; they default to empty.
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub published: String,
    pub sentiment: Option<Sentiment>,
    pub ai_summary: Option<String>,
}

impl NewsRecord {
    /// A record is an enrichment candidate until the model has filled it in.
    pub fn is_unannotated(&self) -> bool {
        self.sentiment.is_none()
    }
}

/// Payload for an insert; the store assigns the id.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewRecord {
    pub ticker: String,
    pub title: String,
    pub link: String,
    pub publisher: String,
    pub published: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_parses_case_insensitively() {
        assert_eq!("Positive".parse::<Sentiment>().unwrap(), Sentiment::Positive);
        assert_eq!("NEGATIVE".parse::<Sentiment>().unwrap(), Sentiment::Negative);
        assert_eq!(" neutral ".parse::<Sentiment>().unwrap(), Sentiment::Neutral);
        assert!("bullish".parse::<Sentiment>().is_err());
    }

    #[test]
    fn sentiment_serde_round_trips_as_plain_string() {
        let json = serde_json::to_string(&Sentiment::Positive).unwrap();
        assert_eq!(json, r#""Positive""#);
        let back: Sentiment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Sentiment::Positive);
    }
}
