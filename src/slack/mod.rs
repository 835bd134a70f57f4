//! Slack Web API integration
//!
//! - [`SlackApi`]: the calls the provider makes
//! - [`SlackClient`]: reqwest implementation with Bot token auth
//! - domain types for channels, users and user groups

mod api;
mod client;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use api::SlackApi;
pub use client::SlackClient;
pub use types::{AuthIdentity, Channel, User, UserGroup, UserGroupSpec};
