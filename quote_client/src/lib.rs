//! Quote client library.
//!
//! - `client` — `QuoteClient`, one deadline-bounded call to the server's `/quote` route.
//! - `writer` — `persist_bid`, which replaces the output artifact with the latest bid.
//! - `args` — CLI / environment arguments of the client binary.
#![warn(missing_docs)]
pub mod args;
pub mod client;
pub mod writer;
