//! `slack_channel` resource
//!
//! Creates a public or private channel, keeps its name, topic and
//! description in sync, and archives it on destroy.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::framework::{
    decode, decode_planned, encode, null_as_default, Attribute, AttributeType, Diagnostics,
    PlanModifier, Resource, Schema,
};
use crate::lookup;
use crate::slack::{Channel, SlackApi};


/// Terraform state for `slack_channel`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_private: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub topic: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl From<Channel> for ChannelModel {
    fn from(c: Channel) -> Self {
        Self {
            id: c.id,
            name: c.name,
            is_private: c.is_private,
            topic: c.topic,
            description: c.purpose,
        }
    }
}

pub struct ChannelResource {
    api: Arc<dyn SlackApi>,
}

impl ChannelResource {
    pub fn new(api: Arc<dyn SlackApi>) -> Self {
        Self { api }
    }

    async fn refresh(
        &self,
        cancel: &CancellationToken,
        id: &str,
    ) -> Result<ChannelModel, Diagnostics> {
        lookup::channel_by_id(self.api.as_ref(), cancel, id)
            .await
            .map(ChannelModel::from)
            .map_err(|e| Diagnostics::client_error("Unable to read channel", &e))
    }
}

#[async_trait]
impl Resource for ChannelResource {
    fn type_suffix(&self) -> &'static str {
        "_channel"
    }

    fn schema(&self) -> Schema {
        Schema::new(
            "Creates a public or private slack channel.\n\n### Required Permissions\n- `channels:manage`\n",
        )
        .attribute(
            "name",
            Attribute::required(AttributeType::String).describe("The name of the channel to create."),
        )
        .attribute(
            "is_private",
            Attribute::optional_computed(AttributeType::Bool)
                .describe("Create a private channel instead of a public one.")
                .with_default(json!(false)),
        )
        .attribute(
            "topic",
            Attribute::optional_computed(AttributeType::String)
                .describe("The Channel's topic.")
                .with_default(json!("")),
        )
        .attribute(
            "description",
            Attribute::optional_computed(AttributeType::String)
                .describe("The Channel's description.")
                .with_default(json!("")),
        )
        .attribute(
            "id",
            Attribute::computed(AttributeType::String)
                .describe("Channel identifier")
                .with_plan_modifier(PlanModifier::UseStateForUnknown),
        )
    }

    async fn create(&self, cancel: &CancellationToken, plan: Value) -> Result<Value, Diagnostics> {
        let plan: ChannelModel = decode_planned(&self.schema(), plan)?;

        let created = self
            .api
            .create_conversation(&plan.name, plan.is_private)
            .await
            .map_err(|e| {
                Diagnostics::client_error(&format!("Unable to create channel: {}", plan.name), &e)
            })?;

        if !plan.description.is_empty() {
            trace!(channel = %created.id, "setting channel description");
            self.api
                .set_conversation_purpose(&created.id, &plan.description)
                .await
                .map_err(|e| Diagnostics::client_error("Unable to set channel description", &e))?;
        }

        if !plan.topic.is_empty() {
            trace!(channel = %created.id, "setting channel topic");
            self.api
                .set_conversation_topic(&created.id, &plan.topic)
                .await
                .map_err(|e| Diagnostics::client_error("Unable to set channel topic", &e))?;
        }

        let state = self.refresh(cancel, &created.id).await?;
        debug!(id = %state.id, name = %state.name, "created slack channel");
        encode(&state)
    }

    async fn read(&self, cancel: &CancellationToken, state: Value) -> Result<Value, Diagnostics> {
        let state: ChannelModel = decode(state)?;
        encode(&self.refresh(cancel, &state.id).await?)
    }

    async fn update(
        &self,
        cancel: &CancellationToken,
        plan: Value,
        state: Value,
    ) -> Result<Value, Diagnostics> {
        let plan: ChannelModel = decode_planned(&self.schema(), plan)?;
        let state: ChannelModel = decode(state)?;
        let id = state.id.as_str();

        if plan.name != state.name {
            trace!(channel = id, "updating channel name");
            self.api
                .rename_conversation(id, &plan.name)
                .await
                .map_err(|e| Diagnostics::client_error("Unable to update channel name", &e))?;
        }

        if plan.description != state.description {
            trace!(channel = id, "updating channel description");
            self.api
                .set_conversation_purpose(id, &plan.description)
                .await
                .map_err(|e| {
                    Diagnostics::client_error("Unable to update channel description", &e)
                })?;
        }

        if plan.topic != state.topic {
            trace!(channel = id, "updating channel topic");
            self.api
                .set_conversation_topic(id, &plan.topic)
                .await
                .map_err(|e| Diagnostics::client_error("Unable to update channel topic", &e))?;
        }

        encode(&self.refresh(cancel, id).await?)
    }

    async fn delete(&self, _cancel: &CancellationToken, state: Value) -> Result<(), Diagnostics> {
        let state: ChannelModel = decode(state)?;

        match self.api.archive_conversation(&state.id).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_slack_code("channel_not_found") => {
                debug!(channel = %state.id, "channel already gone");
                Ok(())
            }
            Err(e) => Err(Diagnostics::client_error("Unable to archive channel", &e)),
        }
    }
}
