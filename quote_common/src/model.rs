//! Quote data model and the provider / wire shapes around it.
//!
//! A [`Quote`] is built from the provider's [`ProviderPayload`], validated, persisted once
//! and afterwards only read. Decimal fields are kept as the provider's exact strings.
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::Result;

/// Pair key used by the default provider.
pub const DEFAULT_PAIR: &str = "USDBRL";

/// One exchange-rate observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Store-assigned identifier, `None` until persisted.
    pub id: Option<i64>,
    /// Base currency code, e.g. `USD`.
    pub code: String,
    /// Counter currency code, e.g. `BRL`.
    pub counter_code: String,
    /// Human-readable pair name.
    pub name: String,
    /// Session high.
    pub high: String,
    /// Session low.
    pub low: String,
    /// Absolute bid variation.
    pub var_bid: String,
    /// Percentage change.
    pub pct_change: String,
    /// Bid price.
    pub bid: String,
    /// Ask price.
    pub ask: String,
    /// Provider timestamp, opaque.
    pub timestamp: String,
    /// Provider creation date, opaque.
    pub create_date: String,
    /// Wall-clock time at which the quote was fetched and validated.
    pub recorded_at: DateTime<Utc>,
}

impl Quote {
    /// Reject quotes without a bid.
    pub fn validate(&self) -> Result<()> {
        if self.bid.is_empty() {
            return Err(AppError::validation("bid must not be empty"));
        }
        Ok(())
    }
}

/// Quote as the provider sends it. Absent fields decode as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderQuote {
    /// Base currency code, e.g. `USD`.
    pub code: String,
    /// Counter currency code.
    pub codein: String,
    /// Human-readable pair name.
    pub name: String,
    /// Session high.
    pub high: String,
    /// Session low.
    pub low: String,
    /// Absolute bid variation.
    #[serde(rename = "varBid")]
    pub var_bid: String,
    /// Percentage change.
    #[serde(rename = "pctChange")]
    pub pct_change: String,
    /// Bid price.
    pub bid: String,
    /// Ask price.
    pub ask: String,
    /// Provider timestamp.
    pub timestamp: String,
    /// Provider creation date.
    pub create_date: String,
}

impl ProviderQuote {
    /// Project into a domain quote stamped with `recorded_at`.
    pub fn into_quote(self, recorded_at: DateTime<Utc>) -> Quote {
        Quote {
            id: None,
            code: self.code,
            counter_code: self.codein,
            name: self.name,
            high: self.high,
            low: self.low,
            var_bid: self.var_bid,
            pct_change: self.pct_change,
            bid: self.bid,
            ask: self.ask,
            timestamp: self.timestamp,
            create_date: self.create_date,
            recorded_at,
        }
    }
}

/// Provider body: quotes keyed by pair, e.g. `{"USDBRL": {...}}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ProviderPayload(
    /// Quotes by pair key.
    pub HashMap<String, ProviderQuote>,
);

impl ProviderPayload {
    /// Take the quote for `pair`; a missing pair yields an all-empty quote.
    pub fn take_pair(mut self, pair: &str) -> ProviderQuote {
        self.0.remove(pair).unwrap_or_default()
    }
}

/// Caller-facing projection of a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidResponse {
    /// Bid price, as stored.
    pub bid: String,
}

/// Error body written by the server for any failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Caller-safe message.
    pub error: String,
}
