//! Quote orchestration: fetch, validate, persist, answer.
use std::sync::Arc;

use log::debug;
use quote_common::model::Quote;
use quote_common::{Deadline, Result};

use crate::fetcher::QuoteFetcher;
use crate::store::QuoteStore;

/// Sequences one fetch and one save under the caller's deadline.
///
/// Errors from either stage are returned untouched; their kind already names the
/// cause. No stage is retried.
#[derive(Clone)]
pub struct QuoteService {
    fetcher: Arc<dyn QuoteFetcher>,
    store: Arc<dyn QuoteStore>,
}

impl QuoteService {
    /// Orchestrate `fetcher` and `store`.
    pub fn new(fetcher: Arc<dyn QuoteFetcher>, store: Arc<dyn QuoteStore>) -> Self {
        Self { fetcher, store }
    }

    /// Fetch the latest quote, persist it and return its bid.
    ///
    /// The bid is only returned once the quote is stored.
    pub async fn get_bid(&self, deadline: &Deadline) -> Result<String> {
        let quote = self.fetcher.fetch(deadline).await?;
        let id = self.store.save(deadline, &quote).await?;
        debug!("Quote {} stored, relaying bid {}", id, quote.bid);
        Ok(quote.bid)
    }

    /// Look up a previously stored quote.
    pub async fn find_quote(&self, deadline: &Deadline, id: i64) -> Result<Quote> {
        self.store.find_by_id(deadline, id).await
    }
}
