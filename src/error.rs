//! Unified error type for the fare search engine.
//!
//! The taxonomy mirrors how the resilience layer treats failures: transient
//! errors (timeouts, 5xx, 429, network resets) are retried, permanent
//! provider errors are not, and the fast-fail variants (`CircuitOpen`,
//! `QueueFull`) are produced without touching the network at all.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Network-level failure (connection reset, DNS, unreachable host).
    #[error("transient network error: {0}")]
    Network(String),

    /// Provider responded with an HTTP error status.
    #[error("provider returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Provider rejected the credentials or token exchange failed.
    #[error("provider authentication failed: {0}")]
    Auth(String),

    /// Provider response could not be deserialized.
    #[error("malformed provider response: {0}")]
    Parse(String),

    /// A single attempt exceeded its configured timeout.
    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),

    /// The circuit breaker is open; no call was attempted.
    #[error("circuit open, retry in {retry_after:?}")]
    CircuitOpen { retry_after: Duration },

    /// The concurrency gate and its wait queue are both saturated.
    #[error("provider call rejected: {max_queued} callers already queued")]
    QueueFull { max_queued: usize },

    /// All retry attempts were exhausted; wraps the last transient failure.
    #[error("provider unavailable after {attempts} attempts")]
    ProviderUnavailable {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,

    /// The request shape is invalid; raised before any network activity.
    #[error("invalid request: {0}")]
    Validation(String),
}

impl Error {
    /// Whether the resilience layer may retry after this failure.
    ///
    /// 429 counts as transient (the provider asks us to back off); other
    /// 4xx statuses are permanent caller errors.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Network(_) | Error::Timeout(_) => true,
            Error::Http { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }

    /// Fast-fail errors produced by the protection layers themselves,
    /// without any provider attempt.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::CircuitOpen { .. } | Error::QueueFull { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(Error::Network("reset".into()).is_transient());
        assert!(Error::Timeout(Duration::from_secs(30)).is_transient());
        assert!(Error::Http { status: 503, message: String::new() }.is_transient());
        assert!(Error::Http { status: 429, message: String::new() }.is_transient());

        assert!(!Error::Http { status: 404, message: String::new() }.is_transient());
        assert!(!Error::Auth("bad token".into()).is_transient());
        assert!(!Error::Parse("truncated body".into()).is_transient());
        assert!(!Error::Cancelled.is_transient());
        assert!(!Error::Validation("empty origins".into()).is_transient());
    }

    #[test]
    fn rejections_are_not_transient() {
        let open = Error::CircuitOpen { retry_after: Duration::from_secs(10) };
        let full = Error::QueueFull { max_queued: 20 };
        assert!(open.is_rejection() && !open.is_transient());
        assert!(full.is_rejection() && !full.is_transient());
    }
}
