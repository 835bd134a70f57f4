//! `slack_usergroup` data source

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::framework::{
    decode, encode, null_as_default, Attribute, AttributeType, ConfigValidator, DataSource,
    Diagnostic, Diagnostics, Schema,
};
use crate::lookup;
use crate::resolve::LookupKey;
use crate::slack::SlackApi;


#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGroupDataModel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_external: bool,
}

impl UserGroupDataModel {
    fn key(&self) -> Option<LookupKey> {
        match (&self.id, &self.handle) {
            (Some(id), _) => Some(LookupKey::Id(id.clone())),
            (None, Some(handle)) => Some(LookupKey::Handle(handle.clone())),
            (None, None) => None,
        }
    }
}

pub struct UserGroupDataSource {
    api: Arc<dyn SlackApi>,
}

impl UserGroupDataSource {
    pub fn new(api: Arc<dyn SlackApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for UserGroupDataSource {
    fn type_suffix(&self) -> &'static str {
        "_usergroup"
    }

    fn schema(&self) -> Schema {
        Schema::new("Reads a slack User Group specified by handle or id.\n\n### Required Permissions\n- `usergroups:read`\n")
            .attribute(
                "id",
                Attribute::optional_computed(AttributeType::String)
                    .describe("Identifier for this User Group."),
            )
            .attribute(
                "handle",
                Attribute::optional_computed(AttributeType::String)
                    .describe("The Slack mention handle of the User Group"),
            )
            .attribute(
                "name",
                Attribute::computed(AttributeType::String).describe("A name for the User Group."),
            )
            .attribute(
                "description",
                Attribute::computed(AttributeType::String)
                    .describe("A short description of the User Group."),
            )
            .attribute(
                "is_external",
                Attribute::computed(AttributeType::Bool)
                    .describe("Indicates whether the User Group is shared from another workspace."),
            )
    }

    fn config_validators(&self) -> Vec<ConfigValidator> {
        vec![ConfigValidator::Conflicting(&["id", "handle"])]
    }

    async fn read(&self, cancel: &CancellationToken, config: Value) -> Result<Value, Diagnostics> {
        let config: UserGroupDataModel = decode(config)?;
        let Some(key) = config.key() else {
            return Err(
                Diagnostic::error("Provider Error", "One of ID or Handle needs to be provided.").into(),
            );
        };

        let group = lookup::usergroup(self.api.as_ref(), cancel, &key)
            .await
            .map_err(|e| Diagnostics::client_error("Unable to find User Group", &e))?;

        encode(&UserGroupDataModel {
            id: Some(group.id),
            handle: Some(group.handle),
            name: group.name,
            description: group.description,
            is_external: group.is_external,
        })
    }
}
