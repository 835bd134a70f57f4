//! `slack_channel` data source

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
pub struct ChannelDataModel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub include_archived: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub topic: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl ChannelDataModel {
    /// A non-empty id wins; otherwise search by name.
    fn request(&self) -> LookupRequest {
        let key = match self.id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => LookupKey::Id(id.to_string()),
            None => LookupKey::Name(self.name.clone().unwrap_or_default()),
        };
        LookupRequest::new(key).include_inactive(self.include_archived.unwrap_or(false))
    }
}

pub struct ChannelDataSource {
    api: Arc<dyn SlackApi>,
}

impl ChannelDataSource {
    pub fn new(api: Arc<dyn SlackApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for ChannelDataSource {
    fn type_suffix(&self) -> &'static str {
        "_channel"
    }

    fn schema(&self) -> Schema {
        Schema::new(
            "Reads a slack channel specified by name or id, and returns attributes.\n\n### Required Permissions\n- `channel:read`\n",
        )
        .attribute(
            "name",
            Attribute::optional(AttributeType::String).describe("The name of the channel"),
        )
        .attribute(
            "id",
            Attribute::optional_computed(AttributeType::String).describe("The Channel ID"),
        )
        .attribute(
            "include_archived",
            Attribute::optional(AttributeType::Bool).describe("Set true to include archived channels."),
        )
        .attribute(
            "topic",
            Attribute::computed(AttributeType::String).describe("The Channel's configured topic."),
        )
        .attribute(
            "description",
            Attribute::computed(AttributeType::String)
                .describe("The Channel's configured description."),
        )
    }

    fn config_validators(&self) -> Vec<ConfigValidator> {
        vec![ConfigValidator::Conflicting(&["id", "name"])]
    }

    async fn read(&self, cancel: &CancellationToken, config: Value) -> Result<Value, Diagnostics> {
        let config: ChannelDataModel = decode(config)?;
        let request = config.request();

        let channel = lookup::channel(self.api.as_ref(), cancel, &request)
            .await
            .map_err(|e| Diagnostics::client_error("Unable to find channel", &e))?;

        encode(&ChannelDataModel {
            id: Some(channel.id),
            name: Some(channel.name),
            include_archived: Some(request.include_inactive),
            topic: channel.topic,
            description: channel.purpose,
        })
    }
}
