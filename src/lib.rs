//! Terraform provider for Slack
//!
//! Manages channels and user groups, and looks up channels, channel
//! members, users and user groups, over the Slack Web API.
//!
//! Lookups that have to search a paginated listing go through
//! [`resolve`], which walks Slack's cursor pages, stops at the first match
//! and waits out rate limits until the caller's [`CancellationToken`] fires.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod config;
pub mod data_sources;
pub mod error;
pub mod framework;
pub mod logging;
pub mod lookup;
pub mod provider;
pub mod resolve;
pub mod resources;
pub mod slack;

pub use config::{ClientOptions, ProviderConfig};
pub use error::{Error, Result};
pub use provider::{ConfiguredProvider, SlackProvider};
pub use resolve::{LookupKey, LookupRequest, Page};
