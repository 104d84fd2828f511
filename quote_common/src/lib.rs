//!
//! Common types and utilities shared by the quote server and client.
//!
//! This crate aggregates:
//! - `error` — the closed error taxonomy `ErrorKind` and the `AppError` envelope.
//! - `result` — handy `Result<T, AppError>` alias.
//! - `deadline` — explicit deadlines passed down the call chain.
//! - `model` — `Quote`, the provider payload and the wire projections.
//! - `net` — networking constants and small helpers.
#![warn(missing_docs)]
pub mod deadline;
pub mod error;
pub mod model;
pub mod net;
pub mod result;

pub use deadline::Deadline;
pub use error::{AppError, ErrorKind};
pub use result::Result;
