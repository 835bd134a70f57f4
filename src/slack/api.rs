//! Slack Web API surface used by the provider
//!
//! Handlers only talk to Slack through [`SlackApi`], so tests can swap in
//! an in-memory workspace.

use async_trait::async_trait;

use super::types::{AuthIdentity, Channel, User, UserGroup, UserGroupSpec};
use crate::error::Result;
use crate::resolve::Page;

/// Trait for Slack API operations (enables mocking in tests)
///
/// Implementations return [`Error::RateLimited`] instead of sleeping; the
/// resolver owns backoff.
///
/// [`Error::RateLimited`]: crate::error::Error::RateLimited
#[async_trait]
pub trait SlackApi: Send + Sync {
    /// `auth.test`
    async fn auth_test(&self) -> Result<AuthIdentity>;

    /// One page of `conversations.list`
    async fn list_conversations(
        &self,
        cursor: Option<&str>,
        exclude_archived: bool,
    ) -> Result<Page<Channel>>;

    /// `conversations.info`
    async fn conversation_info(&self, channel_id: &str) -> Result<Channel>;

    /// `conversations.create`
    async fn create_conversation(&self, name: &str, is_private: bool) -> Result<Channel>;

    /// `conversations.setPurpose`
    async fn set_conversation_purpose(&self, channel_id: &str, purpose: &str) -> Result<()>;

    /// `conversations.setTopic`
    async fn set_conversation_topic(&self, channel_id: &str, topic: &str) -> Result<()>;

    /// `conversations.rename`
    async fn rename_conversation(&self, channel_id: &str, name: &str) -> Result<Channel>;

    /// `conversations.archive`
    async fn archive_conversation(&self, channel_id: &str) -> Result<()>;

    /// One page of `conversations.members`
    async fn conversation_members(
        &self,
        channel_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<String>>;

    /// One page of `users.list` (includes deactivated users)
    async fn list_users(&self, cursor: Option<&str>) -> Result<Page<User>>;

    /// `users.info`
    async fn user_info(&self, user_id: &str) -> Result<User>;

    /// `users.lookupByEmail` (active users only)
    async fn lookup_user_by_email(&self, email: &str) -> Result<User>;

    /// `usergroups.list`, which is not paginated
    async fn list_usergroups(&self) -> Result<Vec<UserGroup>>;

    /// `usergroups.create`
    async fn create_usergroup(&self, spec: &UserGroupSpec) -> Result<UserGroup>;

    /// `usergroups.update`
    async fn update_usergroup(&self, usergroup_id: &str, spec: &UserGroupSpec)
        -> Result<UserGroup>;

    /// `usergroups.disable`
    async fn disable_usergroup(&self, usergroup_id: &str) -> Result<UserGroup>;
}
