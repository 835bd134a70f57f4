//! `slack_user` data source

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::framework::{
    decode, encode, null_as_default, Attribute, AttributeType, ConfigValidator, DataSource,
    Diagnostics, Schema,
};
use crate::lookup;
use crate::resolve::{LookupKey, LookupRequest};
use crate::slack::SlackApi;


#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDataModel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub include_deactivated: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub real_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deleted: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time_zone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_admin: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_bot: bool,
}

impl UserDataModel {
    /// Id first, then email, then name.
    fn request(&self) -> LookupRequest {
        let key = if let Some(id) = &self.id {
            LookupKey::Id(id.clone())
        } else if let Some(email) = &self.email {
            LookupKey::Email(email.clone())
        } else {
            LookupKey::Name(self.name.clone().unwrap_or_default())
        };
        LookupRequest::new(key).include_inactive(self.include_deactivated.unwrap_or(false))
    }
}

pub struct UserDataSource {
    api: Arc<dyn SlackApi>,
}

impl UserDataSource {
    pub fn new(api: Arc<dyn SlackApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for UserDataSource {
    fn type_suffix(&self) -> &'static str {
        "_user"
    }

    fn schema(&self) -> Schema {
        Schema::new(
            "Reads a slack user specified by name or id, and returns attributes.\n\n\
             ### Required Permissions\n- `users:read`\n\
             - `users:read.email` (Only if `email` is used as an input)\n",
        )
        .attribute(
            "name",
            Attribute::optional_computed(AttributeType::String)
                .describe("The Slack handle of the user"),
        )
        .attribute(
            "id",
            Attribute::optional_computed(AttributeType::String).describe(
                "Identifier for this workspace user. It is unique to the workspace containing the user.",
            ),
        )
        .attribute(
            "email",
            Attribute::optional_computed(AttributeType::String)
                .describe("Email address of the user."),
        )
        .attribute(
            "include_deactivated",
            Attribute::optional(AttributeType::Bool)
                .describe("Also match deactivated users when looking up by email."),
        )
        .attribute(
            "real_name",
            Attribute::computed(AttributeType::String).describe("The user's first and last name."),
        )
        .attribute(
            "deleted",
            Attribute::computed(AttributeType::Bool)
                .describe("This user has been deactivated when the value of this field is `true`."),
        )
        .attribute(
            "time_zone",
            Attribute::computed(AttributeType::String).describe(
                "A human-readable string for the geographic timezone-related region this user has specified in their account.",
            ),
        )
        .attribute(
            "is_admin",
            Attribute::computed(AttributeType::Bool)
                .describe("Indicates whether the user is an Admin of the current workspace."),
        )
        .attribute(
            "is_bot",
            Attribute::computed(AttributeType::Bool).describe(
                "Indicates whether the user is actually a bot user. Note that Slackbot is special, so `is_bot` will be false for it.",
            ),
        )
    }

    fn config_validators(&self) -> Vec<ConfigValidator> {
        vec![ConfigValidator::Conflicting(&["id", "name", "email"])]
    }

    async fn read(&self, cancel: &CancellationToken, config: Value) -> Result<Value, Diagnostics> {
        let config: UserDataModel = decode(config)?;

        let user = lookup::user(self.api.as_ref(), cancel, &config.request())
            .await
            .map_err(|e| Diagnostics::client_error("Unable to find user", &e))?;

        encode(&UserDataModel {
            id: Some(user.id),
            name: Some(user.name),
            email: Some(user.email),
            include_deactivated: config.include_deactivated,
            real_name: user.real_name,
            deleted: user.deleted,
            time_zone: user.tz,
            is_admin: user.is_admin,
            is_bot: user.is_bot,
        })
    }
}
