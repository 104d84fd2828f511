//! HTTP client for the quote server.
//!
//! Issues a single `GET /quote` under the caller's deadline and turns the outcome into
//! either the bid or a classified `AppError`. Apart from timeouts and an empty bid,
//! every failure comes back as `Internal`; the server's status and message stay in the
//! error's cause.
use log::{debug, warn};
use quote_common::model::{BidResponse, ErrorBody};
use quote_common::{AppError, Deadline, Result};
use reqwest::Client;

/// Operation label reported when the server call runs out of time.
pub const SERVER_CALL: &str = "server call";

/// Client for the quote server's bid route.
#[derive(Debug, Clone)]
pub struct QuoteClient {
    client: Client,
    url: String,
}

impl QuoteClient {
    /// Client for the bid route at `url`.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().build().map_err(AppError::internal)?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Fetch the current bid before `deadline`.
    pub async fn get_bid(&self, deadline: &Deadline) -> Result<String> {
        let body = deadline.run(SERVER_CALL, self.request()).await?;
        let response: BidResponse = serde_json::from_slice(&body).map_err(|e| {
            AppError::internal(format!("failed to parse server JSON: {}", e))
        })?;
        if response.bid.is_empty() {
            return Err(AppError::validation("bid must not be empty"));
        }
        debug!("Server bid: {}", response.bid);
        Ok(response.bid)
    }

    async fn request(&self) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(classify_transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(classify_transport)?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            warn!("Server answered {}: {}", status, detail);
            return Err(AppError::internal(format!(
                "status {}: {}",
                status.as_u16(),
                detail
            )));
        }
        Ok(body.to_vec())
    }
}

fn classify_transport(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::timeout(SERVER_CALL, err)
    } else {
        AppError::internal(err)
    }
}
