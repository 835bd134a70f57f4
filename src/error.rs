//! Error types for the Slack provider.
//!
//! [`Error`] covers everything that can go wrong between a lifecycle handler
//! and the Slack Web API. Handlers turn it into [`Diagnostics`] at the
//! framework boundary.
//!
//! [`Diagnostics`]: crate::framework::Diagnostics

use std::time::Duration;

use thiserror::Error;

use crate::resolve::LookupKey;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the Slack client, the resolver and the lookups.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Every page was scanned and nothing matched the key.
    #[error("{kind} not found: {key}")]
    NotFound {
        /// What was being looked up ("channel", "user", ...).
        kind: &'static str,
        /// The key the caller asked for.
        key: LookupKey,
    },

    /// Slack is throttling us. Absorbed by the resolver unless cancelled.
    #[error("rate limited: retry after {}s", retry_after.as_secs())]
    RateLimited {
        /// How long Slack asked us to wait.
        retry_after: Duration,
    },

    /// The caller cancelled while we were waiting out a rate limit.
    #[error("operation cancelled while waiting for rate limit to clear")]
    Cancelled,

    /// Slack answered `ok: false` with this error code.
    #[error("{0}")]
    Slack(String),

    /// Non-success HTTP status other than 429.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// Network or TLS failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not what we expected.
    #[error("parse error: {0}")]
    Parse(String),

    /// Provider configuration is missing or invalid.
    #[error("invalid config: {0}")]
    Config(String),
}

impl Error {
    /// Build a [`Error::NotFound`] for the given object kind.
    pub fn not_found(kind: &'static str, key: LookupKey) -> Self {
        Self::NotFound { kind, key }
    }

    /// True when Slack rejected the call with exactly this error code.
    #[must_use]
    pub fn is_slack_code(&self, code: &str) -> bool {
        matches!(self, Self::Slack(c) if c == code)
    }

    /// True for the "nothing matched" outcome.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_carries_key() {
        let err = Error::not_found("channel", LookupKey::Name("general".to_string()));
        assert_eq!(err.to_string(), "channel not found: name \"general\"");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_slack_error_is_verbatim_code() {
        let err = Error::Slack("channel_not_found".to_string());
        assert_eq!(err.to_string(), "channel_not_found");
        assert!(err.is_slack_code("channel_not_found"));
        assert!(!err.is_slack_code("users_not_found"));
    }

    #[test]
    fn test_rate_limited_message_shows_seconds() {
        let err = Error::RateLimited {
            retry_after: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "rate limited: retry after 30s");
    }

    #[test]
    fn test_status_message() {
        let err = Error::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 500: boom");
    }
}
