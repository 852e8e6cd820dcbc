//! The facts document and the sources that produce it.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::config::Config;

mod file;
mod http;
pub mod retry;

pub use file::FileFactsSource;
pub use http::HttpFactsSource;

/// Shown when the backend answers with neither facts nor a message.
pub const DEFAULT_EMPTY_MESSAGE: &str = "No facts available yet.";

/// Snapshot of the analysis state, keyed by section name
/// (`structure`, `fvgs`, `session`, `levels`, `sweeps`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct FactsDocument {
    sections: Map<String, Value>,
}

impl FactsDocument {
    pub fn new(sections: Map<String, Value>) -> Self {
        Self { sections }
    }

    /// Section names in document order.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn section(&self, name: &str) -> Option<&Value> {
        self.sections.get(name)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Hex SHA-256 of the serialized document.
    pub fn digest(&self) -> String {
        let body = Value::Object(self.sections.clone()).to_string();
        let mut hasher = Sha256::new();
        hasher.update(body.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Wire shape: `{ "facts"?: {...}, "message"?: "..." }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FactsResponse {
    #[serde(default)]
    pub facts: Option<Map<String, Value>>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A successful retrieval. `Empty` is the backend saying "nothing yet",
/// not a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum FactsReply {
    Document(FactsDocument),
    Empty(String),
}

impl FactsResponse {
    pub fn into_reply(self) -> FactsReply {
        match (self.facts, self.message) {
            (Some(facts), _) => FactsReply::Document(FactsDocument::new(facts)),
            (None, Some(message)) if !message.trim().is_empty() => FactsReply::Empty(message),
            (None, _) => FactsReply::Empty(DEFAULT_EMPTY_MESSAGE.to_string()),
        }
    }
}

pub fn parse_response(body: &str) -> Result<FactsReply> {
    let resp: FactsResponse = serde_json::from_str(body)?;
    Ok(resp.into_reply())
}

#[async_trait]
pub trait FactsSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;
    /// Retrieve the latest facts. Takes no parameters by contract.
    async fn fetch(&self) -> Result<FactsReply>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Http,
    File,
}

impl SourceKind {
    pub fn from_env() -> Self {
        match std::env::var("FACTS_SOURCE").unwrap_or_else(|_| "http".to_string()).as_str() {
            "file" => SourceKind::File,
            _ => SourceKind::Http,
        }
    }

    pub fn build(self, cfg: &Config) -> Result<Box<dyn FactsSource>> {
        match self {
            SourceKind::Http => Ok(Box::new(HttpFactsSource::new(cfg)?)),
            SourceKind::File => Ok(Box::new(FileFactsSource::new(&cfg.facts_file))),
        }
    }
}
