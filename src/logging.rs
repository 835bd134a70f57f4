//! Tracing setup for the plugin process
//!
//! Terraform captures the provider's stderr, so logs go there. The level
//! follows `TF_LOG_PROVIDER`, then `RUST_LOG`, then defaults to `info`.

use tracing_subscriber::EnvFilter;

/// Terraform's per-provider log level variable
pub const TF_LOG_ENV: &str = "TF_LOG_PROVIDER";

const DEFAULT_FILTER: &str = "info";

/// Build the filter from the environment.
pub fn env_filter() -> EnvFilter {
    std::env::var(TF_LOG_ENV)
        .ok()
        .and_then(|level| tf_log_level(&level))
        .map(EnvFilter::new)
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Map a `TF_LOG*` value onto a tracing level. `JSON` means trace output.
fn tf_log_level(value: &str) -> Option<&'static str> {
    match value.trim().to_ascii_lowercase().as_str() {
        "trace" | "json" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" => Some("warn"),
        "error" => Some("error"),
        "off" => Some("off"),
        _ => None,
    }
}

/// Install the global subscriber. Fails if one is already set.
pub fn try_init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
}

/// Like [`try_init`], ignoring an already-installed subscriber.
pub fn init() {
    let _ = try_init();
}
