//! `slack_usergroup` resource

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::framework::{
    decode, decode_planned, encode, null_as_default, Attribute, AttributeType, Diagnostics,
    PlanModifier, Resource, Schema,
};
use crate::lookup;
use crate::resolve::LookupKey;
use crate::slack::{SlackApi, UserGroup, UserGroupSpec};


/// Terraform state for `slack_usergroup`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGroupModel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub handle: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl UserGroupModel {
    fn spec(&self) -> UserGroupSpec {
        UserGroupSpec {
            name: self.name.clone(),
            handle: self.handle.clone(),
            description: self.description.clone(),
        }
    }

    fn with_group(self, group: UserGroup) -> Self {
        Self {
            id: self.id,
            name: group.name,
            handle: group.handle,
            description: group.description,
        }
    }
}

/// Slack has no way to clear a handle, so dropping one forces a new group.
fn handle_cleared(state: &Value, plan: &Value) -> bool {
    let state = state.as_str().unwrap_or_default();
    let plan = plan.as_str().unwrap_or_default();
    !state.is_empty() && plan.is_empty()
}

pub struct UserGroupResource {
    api: Arc<dyn SlackApi>,
}

impl UserGroupResource {
    pub fn new(api: Arc<dyn SlackApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Resource for UserGroupResource {
    fn type_suffix(&self) -> &'static str {
        "_usergroup"
    }

    fn schema(&self) -> Schema {
        Schema::new("Creates a Slack User Group.\n\n### Required Permissions\n- `usergroups:write`\n")
            .attribute(
                "id",
                Attribute::computed(AttributeType::String)
                    .describe("Identifier for this User Group.")
                    .with_plan_modifier(PlanModifier::UseStateForUnknown),
            )
            .attribute(
                "name",
                Attribute::required(AttributeType::String)
                    .describe("A name for the User Group. Must be unique among User Groups."),
            )
            .attribute(
                "handle",
                Attribute::optional_computed(AttributeType::String)
                    .describe("A mention handle. Must be unique among channels, users and User Groups.")
                    .with_default(json!(""))
                    .with_plan_modifier(PlanModifier::RequiresReplaceIf {
                        description: "Handle cannot be removed once it is set.",
                        check: handle_cleared,
                    }),
            )
            .attribute(
                "description",
                Attribute::optional_computed(AttributeType::String)
                    .describe("A short description of the User Group.")
                    .with_default(json!("")),
            )
    }

    async fn create(&self, _cancel: &CancellationToken, plan: Value) -> Result<Value, Diagnostics> {
        let plan: UserGroupModel = decode_planned(&self.schema(), plan)?;

        let group = self
            .api
            .create_usergroup(&plan.spec())
            .await
            .map_err(|e| Diagnostics::client_error("Unable to create User Group", &e))?;

        debug!(id = %group.id, handle = %group.handle, "created slack user group");
        encode(&UserGroupModel {
            id: group.id.clone(),
            ..plan.with_group(group)
        })
    }

    async fn read(&self, cancel: &CancellationToken, state: Value) -> Result<Value, Diagnostics> {
        let state: UserGroupModel = decode(state)?;

        let group = lookup::usergroup(self.api.as_ref(), cancel, &LookupKey::Id(state.id.clone()))
            .await
            .map_err(|e| Diagnostics::client_error("Unable to find User Group", &e))?;

        encode(&state.with_group(group))
    }

    async fn update(
        &self,
        _cancel: &CancellationToken,
        plan: Value,
        state: Value,
    ) -> Result<Value, Diagnostics> {
        let plan: UserGroupModel = decode_planned(&self.schema(), plan)?;
        let state: UserGroupModel = decode(state)?;

        let group = self
            .api
            .update_usergroup(&state.id, &plan.spec())
            .await
            .map_err(|e| Diagnostics::client_error("Unable to Update User Group", &e))?;

        encode(&UserGroupModel {
            id: state.id,
            ..plan.with_group(group)
        })
    }

    async fn delete(&self, _cancel: &CancellationToken, state: Value) -> Result<(), Diagnostics> {
        let state: UserGroupModel = decode(state)?;

        self.api
            .disable_usergroup(&state.id)
            .await
            .map_err(|e| Diagnostics::client_error("Unable to disable User Group", &e))?;
        Ok(())
    }
}
