//! Upstream quote fetcher.
//!
//! [`QuoteFetcher`] is the seam the service depends on; [`HttpQuoteFetcher`] is the
//! provider-backed implementation. One call to `fetch` issues exactly one outbound
//! request, bounded by the caller's deadline narrowed to the configured API budget.
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use quote_common::model::{ProviderPayload, Quote};
use quote_common::{AppError, Deadline, Result};
use reqwest::Client;

use crate::config::ApiConfig;

/// Operation label reported when the provider call runs out of time.
pub const UPSTREAM_CALL: &str = "upstream call";

/// Source of fresh quotes.
#[async_trait]
pub trait QuoteFetcher: Send + Sync {
    /// Fetch and validate one quote before `deadline`.
    async fn fetch(&self, deadline: &Deadline) -> Result<Quote>;
}

/// Fetches quotes from the HTTP provider.
#[derive(Debug, Clone)]
pub struct HttpQuoteFetcher {
    client: Client,
    base_url: String,
    pair: String,
    timeout: Duration,
}

impl HttpQuoteFetcher {
    /// Build a fetcher for the provider described by `config`.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(AppError::internal)?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            pair: config.pair.clone(),
            timeout: config.timeout,
        })
    }

    async fn request(&self) -> Result<ProviderPayload> {
        let response = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        // Read the whole body on every path so the connection goes back to the pool.
        let body = response.bytes().await.map_err(classify_transport)?;
        if !status.is_success() {
            warn!("Provider answered {} ({} bytes)", status, body.len());
            return Err(AppError::upstream(format!(
                "status {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown")
            )));
        }

        serde_json::from_slice(&body).map_err(|e| {
            AppError::upstream(format!("failed to parse provider JSON: {}", e))
        })
    }
}

#[async_trait]
impl QuoteFetcher for HttpQuoteFetcher {
    async fn fetch(&self, deadline: &Deadline) -> Result<Quote> {
        let deadline = deadline.bounded(self.timeout);
        debug!(
            "Fetching {} from {} (budget {:?})",
            self.pair,
            self.base_url,
            deadline.remaining()
        );
        let payload = deadline.run(UPSTREAM_CALL, self.request()).await?;

        let quote = payload.take_pair(&self.pair).into_quote(Utc::now());
        quote.validate()?;
        debug!("Provider bid for {}: {}", self.pair, quote.bid);
        Ok(quote)
    }
}

fn classify_transport(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::timeout(UPSTREAM_CALL, err)
    } else {
        AppError::upstream(err)
    }
}
