//! Deadlines passed explicitly down the call chain.
//!
//! A [`Deadline`] is an absolute point on the tokio clock (or no bound at all). Each
//! stage narrows the deadline it was given with [`Deadline::bounded`] and runs its I/O
//! through [`Deadline::run`], which drops the in-flight future the moment the deadline
//! passes. A derived deadline is never later than its parent.
use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::AppError;
use crate::result::Result;

/// Absolute time bound for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// Deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Some(Instant::now() + timeout),
        }
    }

    /// No bound; stages fall back to their own budgets.
    pub fn unbounded() -> Self {
        Self { at: None }
    }

    /// Absolute bound, `None` when unbounded.
    pub fn instant(&self) -> Option<Instant> {
        self.at
    }

    /// Sub-deadline no later than `min(self, now + budget)`.
    pub fn bounded(&self, budget: Duration) -> Self {
        let cap = Instant::now() + budget;
        let at = match self.at {
            Some(parent) => parent.min(cap),
            None => cap,
        };
        Self { at: Some(at) }
    }

    /// Time left, `None` when unbounded. Zero once expired.
    pub fn remaining(&self) -> Option<Duration> {
        self.at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Whether the bound has already passed.
    pub fn is_expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }

    /// Drive `fut` until it finishes or the deadline passes.
    ///
    /// On expiry the future is dropped, which aborts whatever I/O it had in flight, and
    /// a timeout labelled with `operation` is returned. An already expired deadline
    /// never starts the operation.
    pub async fn run<T, F>(&self, operation: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let Some(at) = self.at else {
            return fut.await;
        };
        if Instant::now() >= at {
            return Err(AppError::timeout(operation, "deadline already expired"));
        }
        match tokio::time::timeout_at(at, fut).await {
            Ok(result) => result,
            Err(elapsed) => Err(AppError::timeout(operation, elapsed)),
        }
    }
}

/// Parse a configuration duration such as `10ms`, `200ms`, `1s`, `5m`, `1h`, `500us`.
///
/// A bare number is taken as milliseconds.
pub fn parse_duration(raw: &str) -> std::result::Result<Duration, String> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (value, unit) = raw.split_at(split);
    let value: u64 = value
        .parse()
        .map_err(|_| format!("invalid duration: {:?}", raw))?;
    match unit.trim() {
        "" | "ms" => Ok(Duration::from_millis(value)),
        "ns" => Ok(Duration::from_nanos(value)),
        "us" | "µs" => Ok(Duration::from_micros(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value.saturating_mul(60))),
        "h" => Ok(Duration::from_secs(value.saturating_mul(3600))),
        other => Err(format!("unknown duration unit {:?} in {:?}", other, raw)),
    }
}
