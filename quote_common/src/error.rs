//! Error taxonomy shared between server and client.
//!
//! Every failure in the quote pipeline is classified at the point where it is detected
//! into one [`ErrorKind`] and carried upward inside an [`AppError`]. The kind decides the
//! caller-visible HTTP status; the message is what the caller is allowed to see; the
//! optional source keeps the underlying failure for logs.
use std::error::Error as StdError;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;

/// Boxed underlying failure kept as the source of an [`AppError`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Closed set of failure classes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum ErrorKind {
    /// A stage ran past its deadline.
    #[strum(serialize = "TIMEOUT")]
    Timeout,
    /// The upstream provider failed or answered with something unusable.
    #[strum(serialize = "API_ERROR")]
    Upstream,
    /// The backing store rejected or failed an operation.
    #[strum(serialize = "DATABASE_ERROR")]
    Storage,
    /// Data failed a domain invariant.
    #[strum(serialize = "VALIDATION_ERROR")]
    Validation,
    /// A lookup matched nothing.
    #[strum(serialize = "NOT_FOUND")]
    NotFound,
    /// Anything that could not be classified more precisely.
    #[strum(serialize = "INTERNAL_ERROR")]
    Internal,
}

impl ErrorKind {
    /// HTTP status reported to callers for this kind.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::Timeout => 504,
            ErrorKind::Upstream => 502,
            ErrorKind::Storage => 500,
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Internal => 500,
        }
    }
}

/// Structured failure envelope: classification, caller-facing message, optional cause.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct AppError {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl AppError {
    fn new(kind: ErrorKind, message: impl Into<String>, source: Option<BoxError>) -> Self {
        Self {
            kind,
            message: message.into(),
            source,
        }
    }

    /// Deadline expired while running `operation`.
    pub fn timeout(operation: &str, cause: impl Into<BoxError>) -> Self {
        Self::new(
            ErrorKind::Timeout,
            format!("Timeout while executing operation: {}", operation),
            Some(cause.into()),
        )
    }

    /// Failure talking to the upstream provider.
    pub fn upstream(cause: impl Into<BoxError>) -> Self {
        Self::new(
            ErrorKind::Upstream,
            "Failed to call external API",
            Some(cause.into()),
        )
    }

    /// Failure inside the backing store.
    pub fn storage(cause: impl Into<BoxError>) -> Self {
        Self::new(
            ErrorKind::Storage,
            "Failed to access database",
            Some(cause.into()),
        )
    }

    /// Domain invariant violated; `message` is shown to the caller as is.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message, None)
    }

    /// Unclassified failure. The cause is kept for logs only.
    pub fn internal(cause: impl Into<BoxError>) -> Self {
        Self::new(
            ErrorKind::Internal,
            "Internal server error",
            Some(cause.into()),
        )
    }

    /// Nothing matched a lookup for `resource`.
    pub fn not_found(resource: &str) -> Self {
        Self::new(ErrorKind::NotFound, format!("{} not found", resource), None)
    }

    /// Classification of this failure.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Message safe to show to callers.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status for this error, see [`ErrorKind::status_code`].
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    /// Message followed by the whole source chain, for log lines.
    pub fn detailed(&self) -> String {
        let mut out = format!("[{}] {}", self.kind, self.message);
        let mut cause = self.source.as_deref().map(|e| e as &(dyn StdError + 'static));
        while let Some(err) = cause {
            out.push_str(": ");
            out.push_str(&err.to_string());
            cause = err.source();
        }
        out
    }
}
