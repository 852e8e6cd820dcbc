use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

use crate::facts::retry::RetryConfig;

pub const DEFAULT_FACTS_URL: &str = "http://127.0.0.1:8765/api/facts";
pub const DEFAULT_FACTS_FILE: &str = "fixtures/facts_sample.json";

#[derive(Clone, Debug)]
pub struct Config {
    pub facts_url: String,
    pub facts_file: String,
    /// Successful results younger than this are reused when the panel reopens.
    pub stale_secs: u64,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_base_ms: u64,
    pub stub_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            facts_url: DEFAULT_FACTS_URL.to_string(),
            facts_file: DEFAULT_FACTS_FILE.to_string(),
            stale_secs: 30,
            timeout_secs: 10,
            max_retries: 2,
            retry_base_ms: 200,
            stub_port: 8765,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            facts_url: std::env::var("FACTS_URL").unwrap_or(d.facts_url),
            facts_file: std::env::var("FACTS_FILE").unwrap_or(d.facts_file),
            stale_secs: std::env::var("FACTS_STALE_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.stale_secs),
            timeout_secs: std::env::var("FACTS_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.timeout_secs),
            max_retries: std::env::var("FACTS_MAX_RETRIES").ok().and_then(|v| v.parse().ok()).unwrap_or(d.max_retries),
            retry_base_ms: std::env::var("FACTS_RETRY_BASE_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.retry_base_ms),
            stub_port: std::env::var("FACTS_STUB_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(d.stub_port),
        }
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            base_delay_ms: self.retry_base_ms,
            ..Default::default()
        }
    }

    /// Parsed facts endpoint. Only http and https are accepted.
    pub fn facts_endpoint(&self) -> Result<Url> {
        let url = Url::parse(&self.facts_url)
            .with_context(|| format!("invalid FACTS_URL {:?}", self.facts_url))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => anyhow::bail!("unsupported FACTS_URL scheme: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint_parses() {
        let cfg = Config::default();
        let url = cfg.facts_endpoint().unwrap();
        assert_eq!(url.path(), "/api/facts");
        assert_eq!(url.port(), Some(8765));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let cfg = Config {
            facts_url: "ftp://example.com/facts".to_string(),
            ..Default::default()
        };
        let err = cfg.facts_endpoint().unwrap_err();
        assert!(err.to_string().contains("ftp"));
    }

    #[test]
    fn test_rejects_garbage_url() {
        let cfg = Config {
            facts_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(cfg.facts_endpoint().is_err());
    }

    #[test]
    fn test_retry_from_config() {
        let cfg = Config {
            max_retries: 5,
            retry_base_ms: 10,
            ..Default::default()
        };
        let retry = cfg.retry();
        assert_eq!(retry.max_retries, 5);
        assert_eq!(retry.base_delay_ms, 10);
    }
}
