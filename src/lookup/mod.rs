//! Channel, user and user group lookups
//!
//! Thin wrappers that plug Slack endpoints and match predicates into
//! [`resolve::scan`]. Id lookups go straight to the single-item endpoint.

use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::error::{Error, Result};
use crate::resolve::{self, LookupKey, LookupRequest, Page};
use crate::slack::{Channel, SlackApi, User, UserGroup};

#[cfg(test)]
mod tests;

/// Resolve a channel by id or name.
pub async fn channel(
    api: &dyn SlackApi,
    cancel: &CancellationToken,
    request: &LookupRequest,
) -> Result<Channel> {
    match &request.key {
        LookupKey::Id(id) => channel_by_id(api, cancel, id).await,
        LookupKey::Name(name) => channel_by_name(api, cancel, name, !request.include_inactive).await,
        other => Err(Error::not_found("channel", other.clone())),
    }
}

pub async fn channel_by_id(
    api: &dyn SlackApi,
    cancel: &CancellationToken,
    id: &str,
) -> Result<Channel> {
    resolve::retry_rate_limited(cancel, || api.conversation_info(id)).await
}

pub async fn channel_by_name(
    api: &dyn SlackApi,
    cancel: &CancellationToken,
    name: &str,
    exclude_archived: bool,
) -> Result<Channel> {
    trace!(name, exclude_archived, "searching channels");
    resolve::scan(
        cancel,
        |cursor| async move { api.list_conversations(cursor.as_deref(), exclude_archived).await },
        |channel: &Channel| channel.name == name,
    )
    .await?
    .ok_or_else(|| Error::not_found("channel", LookupKey::Name(name.to_string())))
}

/// Every member id of a channel, across all pages.
pub async fn channel_members(
    api: &dyn SlackApi,
    cancel: &CancellationToken,
    channel_id: &str,
) -> Result<Vec<String>> {
    resolve::collect(cancel, |cursor| async move {
        api.conversation_members(channel_id, cursor.as_deref()).await
    })
    .await
}

/// Resolve a user by id, name or email.
///
/// `include_inactive` only matters for email lookups: Slack's email
/// endpoint skips deactivated accounts, so a miss there falls back to
/// scanning the full user list.
pub async fn user(
    api: &dyn SlackApi,
    cancel: &CancellationToken,
    request: &LookupRequest,
) -> Result<User> {
    match &request.key {
        LookupKey::Id(id) => user_by_id(api, cancel, id).await,
        LookupKey::Name(name) => user_by_name(api, cancel, name).await,
        LookupKey::Email(email) => user_by_email(api, cancel, email, request.include_inactive).await,
        other => Err(Error::not_found("user", other.clone())),
    }
}

pub async fn user_by_id(api: &dyn SlackApi, cancel: &CancellationToken, id: &str) -> Result<User> {
    resolve::retry_rate_limited(cancel, || api.user_info(id)).await
}

pub async fn user_by_name(
    api: &dyn SlackApi,
    cancel: &CancellationToken,
    name: &str,
) -> Result<User> {
    trace!(name, "searching users");
    resolve::scan(
        cancel,
        |cursor| async move { api.list_users(cursor.as_deref()).await },
        |user: &User| user.name == name,
    )
    .await?
    .ok_or_else(|| Error::not_found("user", LookupKey::Name(name.to_string())))
}

pub async fn user_by_email(
    api: &dyn SlackApi,
    cancel: &CancellationToken,
    email: &str,
    include_deactivated: bool,
) -> Result<User> {
    let not_found = || Error::not_found("user", LookupKey::Email(email.to_string()));

    match resolve::retry_rate_limited(cancel, || api.lookup_user_by_email(email)).await {
        Ok(user) => return Ok(user),
        Err(e) if e.is_slack_code("users_not_found") => {
            if !include_deactivated {
                return Err(not_found());
            }
            trace!(email, "user not found in active users, searching deactivated");
        }
        Err(e) => return Err(e),
    }

    resolve::scan(
        cancel,
        |cursor| async move { api.list_users(cursor.as_deref()).await },
        |user: &User| user.email == email,
    )
    .await?
    .ok_or_else(not_found)
}

/// Resolve a user group by id or handle.
///
/// `usergroups.list` is not paginated, so the whole listing is one page.
pub async fn usergroup(
    api: &dyn SlackApi,
    cancel: &CancellationToken,
    key: &LookupKey,
) -> Result<UserGroup> {
    let matches = |group: &UserGroup| match key {
        LookupKey::Id(id) => &group.id == id,
        LookupKey::Handle(handle) => &group.handle == handle,
        _ => false,
    };

    resolve::scan(
        cancel,
        |_| async move { api.list_usergroups().await.map(Page::last) },
        matches,
    )
    .await?
    .ok_or_else(|| Error::not_found("usergroup", key.clone()))
}
