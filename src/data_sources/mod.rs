//! Read-only data sources
//!
//! Each one resolves a single Slack object (or a channel's member list)
//! through [`crate::lookup`] and returns it as Terraform state.

mod channel;
mod channel_members;
mod user;
mod usergroup;

pub use channel::{ChannelDataModel, ChannelDataSource};
pub use channel_members::{ChannelMembersDataSource, ChannelMembersModel};
pub use user::{UserDataModel, UserDataSource};
pub use usergroup::{UserGroupDataModel, UserGroupDataSource};
