use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::retry::{retry_async, HttpStatusError, RetryConfig};
use super::{FactsReply, FactsResponse, FactsSource};
use crate::config::Config;

/// Longest slice of an error body kept in the failure text.
const MAX_ERROR_BODY: usize = 200;

pub struct HttpFactsSource {
    client: Client,
    endpoint: Url,
    retry: RetryConfig,
}

impl HttpFactsSource {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(cfg.timeout())
            .build()
            .context("building http client")?;
        Ok(Self {
            client,
            endpoint: cfg.facts_endpoint()?,
            retry: cfg.retry(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn fetch_once(&self) -> Result<FactsReply> {
        let resp = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .with_context(|| format!("GET {}", self.endpoint))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(anyhow::Error::new(HttpStatusError(status.as_u16()))
                .context(format!("GET {} returned {}", self.endpoint, snippet.trim())));
        }
        let payload: FactsResponse = resp
            .json()
            .await
            .with_context(|| format!("decoding facts from {}", self.endpoint))?;
        Ok(payload.into_reply())
    }
}

#[async_trait]
impl FactsSource for HttpFactsSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self) -> Result<FactsReply> {
        retry_async(&self.retry, "facts_http", || self.fetch_once()).await
    }
}
