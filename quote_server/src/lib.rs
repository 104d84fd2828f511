//! Quote relay server.
//!
//! Fetches the latest quote from the upstream provider, stores it and relays the bid,
//! with every stage bounded by its own deadline:
//!
//! - `fetcher` — `QuoteFetcher` seam and the HTTP provider client.
//! - `store` — `QuoteStore` seam and the pooled SQLite implementation.
//! - `service` — `QuoteService`, the fetch → persist orchestration.
//! - `handler` — axum routes and the error → status translation.
//! - `config` — CLI / environment configuration.
#![warn(missing_docs)]
pub mod config;
pub mod fetcher;
pub mod handler;
pub mod service;
pub mod store;
