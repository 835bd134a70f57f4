//! `slack_channel_members` data source

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::framework::{
    decode, encode, null_as_default, Attribute, AttributeType, DataSource, Diagnostics, Schema,
};
use crate::lookup;
use crate::slack::SlackApi;


#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMembersModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub members: BTreeSet<String>,
}

pub struct ChannelMembersDataSource {
    api: Arc<dyn SlackApi>,
}

impl ChannelMembersDataSource {
    pub fn new(api: Arc<dyn SlackApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for ChannelMembersDataSource {
    fn type_suffix(&self) -> &'static str {
        "_channel_members"
    }

    fn schema(&self) -> Schema {
        Schema::new("Gets the Slack IDs of a given channel's members.\n\n### Required Permissions\n- `channels:read`\n")
            .attribute(
                "id",
                Attribute::optional_computed(AttributeType::String).describe("The ChannelMembers ID"),
            )
            .attribute(
                "members",
                Attribute::optional(AttributeType::StringSet)
                    .describe("Set of channel member's Slack IDs."),
            )
    }

    async fn read(&self, cancel: &CancellationToken, config: Value) -> Result<Value, Diagnostics> {
        let config: ChannelMembersModel = decode(config)?;

        let members = lookup::channel_members(self.api.as_ref(), cancel, &config.id)
            .await
            .map_err(|e| Diagnostics::client_error("Unable to find channel members", &e))?;
        debug!(channel = %config.id, count = members.len(), "listed channel members");

        encode(&ChannelMembersModel {
            id: config.id,
            members: members.into_iter().collect(),
        })
    }
}
