//! Managed resources: `slack_channel` and `slack_usergroup`

mod channel;
mod usergroup;

pub use channel::{ChannelModel, ChannelResource};
pub use usergroup::{UserGroupModel, UserGroupResource};
