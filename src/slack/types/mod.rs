//! Slack domain types and raw API response shapes

use serde::{Deserialize, Serialize};

use crate::resolve::Page;


/// A Slack conversation (public or private channel)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub is_private: bool,
    pub is_archived: bool,
    /// Empty when unset
    pub topic: String,
    /// Empty when unset. Terraform calls this the description.
    pub purpose: String,
}

/// A workspace member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub real_name: String,
    pub email: String,
    pub deleted: bool,
    pub tz: String,
    pub is_admin: bool,
    pub is_bot: bool,
}

/// A user group (mentionable with `@handle`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGroup {
    pub id: String,
    pub handle: String,
    pub name: String,
    pub description: String,
    pub is_external: bool,
}

/// Fields sent when creating or updating a user group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserGroupSpec {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub handle: String,
    pub description: String,
}

/// Identity behind the configured token (from `auth.test`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthIdentity {
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub user_id: String,
}

/// Response from conversations.list
#[derive(Deserialize)]
pub(crate) struct ConversationsListResponse {
    #[serde(default)]
    pub channels: Vec<ChannelResponse>,
    pub response_metadata: Option<ResponseMetadata>,
}

/// Response from conversations.info / create / rename
#[derive(Deserialize)]
pub(crate) struct ConversationResponse {
    pub channel: ChannelResponse,
}

/// Response from conversations.members
#[derive(Deserialize)]
pub(crate) struct ConversationMembersResponse {
    #[serde(default)]
    pub members: Vec<String>,
    pub response_metadata: Option<ResponseMetadata>,
}

/// Response from users.list
#[derive(Deserialize)]
pub(crate) struct UsersListResponse {
    #[serde(default)]
    pub members: Vec<UserResponse>,
    pub response_metadata: Option<ResponseMetadata>,
}

/// Response from users.info / users.lookupByEmail
#[derive(Deserialize)]
pub(crate) struct UserInfoResponse {
    pub user: UserResponse,
}

/// Response from usergroups.list
#[derive(Deserialize)]
pub(crate) struct UserGroupsListResponse {
    #[serde(default)]
    pub usergroups: Vec<UserGroupResponse>,
}

/// Response from usergroups.create / update / disable
#[derive(Deserialize)]
pub(crate) struct UserGroupResponseEnvelope {
    pub usergroup: UserGroupResponse,
}

/// Raw channel data from API
#[derive(Deserialize)]
pub(crate) struct ChannelResponse {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub is_private: Option<bool>,
    pub is_archived: Option<bool>,
    pub topic: Option<TopicResponse>,
    pub purpose: Option<TopicResponse>,
}

/// Raw user data from API
#[derive(Deserialize)]
pub(crate) struct UserResponse {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub real_name: Option<String>,
    pub deleted: Option<bool>,
    pub tz: Option<String>,
    pub is_admin: Option<bool>,
    pub is_bot: Option<bool>,
    pub profile: Option<ProfileResponse>,
}

#[derive(Deserialize)]
pub(crate) struct ProfileResponse {
    pub email: Option<String>,
    pub real_name: Option<String>,
}

/// Raw user group data from API
#[derive(Deserialize)]
pub(crate) struct UserGroupResponse {
    pub id: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub is_external: Option<bool>,
}

/// Topic or purpose field
#[derive(Deserialize)]
pub(crate) struct TopicResponse {
    #[serde(default)]
    pub value: String,
}

/// Pagination metadata
#[derive(Deserialize)]
pub(crate) struct ResponseMetadata {
    pub next_cursor: Option<String>,
}

fn next_cursor(meta: Option<ResponseMetadata>) -> Option<String> {
    meta.and_then(|m| m.next_cursor)
}

impl From<ChannelResponse> for Channel {
    fn from(r: ChannelResponse) -> Self {
        Self {
            id: r.id,
            name: r.name,
            is_private: r.is_private.unwrap_or(false),
            is_archived: r.is_archived.unwrap_or(false),
            topic: r.topic.map(|t| t.value).unwrap_or_default(),
            purpose: r.purpose.map(|p| p.value).unwrap_or_default(),
        }
    }
}

impl From<UserResponse> for User {
    fn from(r: UserResponse) -> Self {
        let (email, profile_real_name) = match r.profile {
            Some(p) => (p.email.unwrap_or_default(), p.real_name),
            None => (String::new(), None),
        };
        Self {
            id: r.id,
            name: r.name,
            real_name: r.real_name.or(profile_real_name).unwrap_or_default(),
            email,
            deleted: r.deleted.unwrap_or(false),
            tz: r.tz.unwrap_or_default(),
            is_admin: r.is_admin.unwrap_or(false),
            is_bot: r.is_bot.unwrap_or(false),
        }
    }
}

impl From<UserGroupResponse> for UserGroup {
    fn from(r: UserGroupResponse) -> Self {
        Self {
            id: r.id,
            handle: r.handle,
            name: r.name,
            description: r.description,
            is_external: r.is_external.unwrap_or(false),
        }
    }
}

impl From<ConversationsListResponse> for Page<Channel> {
    fn from(r: ConversationsListResponse) -> Self {
        Page::new(
            r.channels.into_iter().map(Channel::from).collect(),
            next_cursor(r.response_metadata),
        )
    }
}

impl From<ConversationMembersResponse> for Page<String> {
    fn from(r: ConversationMembersResponse) -> Self {
        Page::new(r.members, next_cursor(r.response_metadata))
    }
}

impl From<UsersListResponse> for Page<User> {
    fn from(r: UsersListResponse) -> Self {
        Page::new(
            r.members.into_iter().map(User::from).collect(),
            next_cursor(r.response_metadata),
        )
    }
}
