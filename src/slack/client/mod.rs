//! Slack HTTP client
//!
//! Handles API requests with Bot token authentication. Rate limits are
//! surfaced as [`Error::RateLimited`] rather than slept on here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::trace;

use super::api::SlackApi;
use super::types::{
    AuthIdentity, Channel, ConversationMembersResponse, ConversationResponse,
    ConversationsListResponse, User, UserGroup, UserGroupResponseEnvelope, UserGroupSpec,
    UserGroupsListResponse, UserInfoResponse, UsersListResponse,
};
use crate::config::ClientOptions;
use crate::error::{Error, Result};
use crate::resolve::Page;


const DEFAULT_RETRY_SECS: u64 = 5;
const PAGE_LIMIT: &str = "200";

/// Slack API client
pub struct SlackClient {
    token: String,
    base_url: String,
    http: Client,
}

impl SlackClient {
    /// Create a new Slack client
    pub fn new(token: impl Into<String>, options: &ClientOptions) -> Result<Self> {
        let http = Client::builder()
            .user_agent(options.user_agent.clone())
            .timeout(options.timeout)
            .build()?;
        Ok(Self {
            token: token.into(),
            base_url: options.base_url.clone(),
            http,
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
    }

    /// Make a GET request with query parameters
    pub async fn get<T: DeserializeOwned>(&self, method: &str, params: &[(&str, &str)]) -> Result<T> {
        trace!(method, "GET");
        let request = self.authorize(self.http.get(self.url(method)).query(params));
        self.execute(request).await
    }

    /// Make a POST request with a JSON body
    pub async fn post<T, B>(&self, method: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        trace!(method, "POST");
        let request = self.authorize(self.http.post(self.url(method)).json(body));
        self.execute(request).await
    }

    /// Send one request and classify the outcome
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after)
                .unwrap_or(Duration::from_secs(DEFAULT_RETRY_SECS));
            return Err(Error::RateLimited { retry_after });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                body: truncate(&body).to_string(),
            });
        }

        let text = response.text().await?;
        parse_response(&text)
    }
}

/// `Retry-After` is whole seconds on Slack.
fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

fn truncate(text: &str) -> &str {
    match text.char_indices().nth(200) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Handle API response and check for Slack-specific errors
fn parse_response<T: DeserializeOwned>(text: &str) -> Result<T> {
    // Slack returns { "ok": false, "error": "..." } for API errors
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| Error::Parse(format!("{}: {}", e, truncate(text))))?;

    if value.get("ok").and_then(serde_json::Value::as_bool) == Some(false) {
        let error = value
            .get("error")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown_error");
        return Err(Error::Slack(error.to_string()));
    }

    serde_json::from_value(value).map_err(|e| Error::Parse(e.to_string()))
}

/// Body-less acknowledgement (`{"ok": true, ...}`)
#[derive(serde::Deserialize)]
struct Ack {}

#[async_trait]
impl SlackApi for SlackClient {
    async fn auth_test(&self) -> Result<AuthIdentity> {
        self.post("auth.test", &json!({})).await
    }

    async fn list_conversations(
        &self,
        cursor: Option<&str>,
        exclude_archived: bool,
    ) -> Result<Page<Channel>> {
        let mut params = vec![
            ("exclude_archived", if exclude_archived { "true" } else { "false" }),
            ("limit", PAGE_LIMIT),
        ];
        if let Some(c) = cursor {
            params.push(("cursor", c));
        }

        let response: ConversationsListResponse = self.get("conversations.list", &params).await?;
        Ok(response.into())
    }

    async fn conversation_info(&self, channel_id: &str) -> Result<Channel> {
        let response: ConversationResponse = self
            .get("conversations.info", &[("channel", channel_id)])
            .await?;
        Ok(response.channel.into())
    }

    async fn create_conversation(&self, name: &str, is_private: bool) -> Result<Channel> {
        let response: ConversationResponse = self
            .post(
                "conversations.create",
                &json!({ "name": name, "is_private": is_private }),
            )
            .await?;
        Ok(response.channel.into())
    }

    async fn set_conversation_purpose(&self, channel_id: &str, purpose: &str) -> Result<()> {
        let _: Ack = self
            .post(
                "conversations.setPurpose",
                &json!({ "channel": channel_id, "purpose": purpose }),
            )
            .await?;
        Ok(())
    }

    async fn set_conversation_topic(&self, channel_id: &str, topic: &str) -> Result<()> {
        let _: Ack = self
            .post(
                "conversations.setTopic",
                &json!({ "channel": channel_id, "topic": topic }),
            )
            .await?;
        Ok(())
    }

    async fn rename_conversation(&self, channel_id: &str, name: &str) -> Result<Channel> {
        let response: ConversationResponse = self
            .post(
                "conversations.rename",
                &json!({ "channel": channel_id, "name": name }),
            )
            .await?;
        Ok(response.channel.into())
    }

    async fn archive_conversation(&self, channel_id: &str) -> Result<()> {
        let _: Ack = self
            .post("conversations.archive", &json!({ "channel": channel_id }))
            .await?;
        Ok(())
    }

    async fn conversation_members(
        &self,
        channel_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<String>> {
        let mut params = vec![("channel", channel_id), ("limit", PAGE_LIMIT)];
        if let Some(c) = cursor {
            params.push(("cursor", c));
        }

        let response: ConversationMembersResponse =
            self.get("conversations.members", &params).await?;
        Ok(response.into())
    }

    async fn list_users(&self, cursor: Option<&str>) -> Result<Page<User>> {
        let mut params = vec![("limit", PAGE_LIMIT)];
        if let Some(c) = cursor {
            params.push(("cursor", c));
        }

        let response: UsersListResponse = self.get("users.list", &params).await?;
        Ok(response.into())
    }

    async fn user_info(&self, user_id: &str) -> Result<User> {
        let response: UserInfoResponse = self.get("users.info", &[("user", user_id)]).await?;
        Ok(response.user.into())
    }

    async fn lookup_user_by_email(&self, email: &str) -> Result<User> {
        let response: UserInfoResponse = self
            .get("users.lookupByEmail", &[("email", email)])
            .await?;
        Ok(response.user.into())
    }

    async fn list_usergroups(&self) -> Result<Vec<UserGroup>> {
        let response: UserGroupsListResponse = self.get("usergroups.list", &[]).await?;
        Ok(response
            .usergroups
            .into_iter()
            .map(UserGroup::from)
            .collect())
    }

    async fn create_usergroup(&self, spec: &UserGroupSpec) -> Result<UserGroup> {
        let response: UserGroupResponseEnvelope = self.post("usergroups.create", spec).await?;
        Ok(response.usergroup.into())
    }

    async fn update_usergroup(
        &self,
        usergroup_id: &str,
        spec: &UserGroupSpec,
    ) -> Result<UserGroup> {
        let mut body = serde_json::to_value(spec).map_err(|e| Error::Parse(e.to_string()))?;
        body["usergroup"] = json!(usergroup_id);

        let response: UserGroupResponseEnvelope = self.post("usergroups.update", &body).await?;
        Ok(response.usergroup.into())
    }

    async fn disable_usergroup(&self, usergroup_id: &str) -> Result<UserGroup> {
        let response: UserGroupResponseEnvelope = self
            .post("usergroups.disable", &json!({ "usergroup": usergroup_id }))
            .await?;
        Ok(response.usergroup.into())
    }
}
