//! Provider configuration
//!
//! The `provider "slack"` block carries an optional API token. When it is
//! absent the token comes from the `SLACK_TOKEN` environment variable.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};


/// Environment variable consulted when the provider block has no token
pub const TOKEN_ENV: &str = "SLACK_TOKEN";

/// Slack Web API root
pub const DEFAULT_API_URL: &str = "https://slack.com/api";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Contents of the `provider "slack"` block
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProviderConfig {
    /// Bot token (xoxb-...)
    #[serde(default)]
    pub token: Option<String>,
}

impl ProviderConfig {
    /// Pick the token to use: explicit config first, then `SLACK_TOKEN`.
    pub fn resolve_token(&self) -> Result<String> {
        if let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) {
            return Ok(token.to_string());
        }

        match std::env::var(TOKEN_ENV) {
            Ok(token) if !token.is_empty() => Ok(token),
            _ => Err(Error::Config(format!(
                "no Slack API token: set `token` in the provider block or the {} environment variable",
                TOKEN_ENV
            ))),
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// API root, without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("terraform-provider-slack/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientOptions {
    /// Point the client at a different API root (tests, proxies).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: &str) -> Self {
        self.user_agent = format!("terraform-provider-slack/{}", version);
        self
    }
}
