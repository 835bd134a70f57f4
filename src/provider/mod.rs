//! The `slack` provider
//!
//! [`SlackProvider`] is what the plugin host instantiates. Configuring it
//! verifies the token against `auth.test` and yields a
//! [`ConfiguredProvider`] that owns the shared client plus every resource
//! and data source, keyed by full Terraform type name.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::{ClientOptions, ProviderConfig};
use crate::data_sources::{
    ChannelDataSource, ChannelMembersDataSource, UserDataSource, UserGroupDataSource,
};
use crate::error::Error;
use crate::framework::{
    decode, type_name, validate_config, Attribute, AttributeType, DataSource, Diagnostic,
    Diagnostics, Resource, Schema,
};
use crate::resources::{ChannelResource, UserGroupResource};
use crate::slack::{SlackApi, SlackClient};


/// Provider type name; every resource and data source is prefixed with it.
pub const TYPE_NAME: &str = "slack";

pub struct SlackProvider {
    version: String,
    options: ClientOptions,
}

impl SlackProvider {
    pub fn new(version: impl Into<String>) -> Self {
        let version = version.into();
        let options = ClientOptions::default().with_version(&version);
        Self { version, options }
    }

    /// Override HTTP settings (API root, timeout). The user agent keeps
    /// the provider version.
    #[must_use]
    pub fn with_client_options(mut self, options: ClientOptions) -> Self {
        self.options = options.with_version(&self.version);
        self
    }

    pub fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn schema(&self) -> Schema {
        Schema::new(
            "A provider to interact with and manage Slack resources.\n\n\
             A slack bot and its OAuth token is required to make use of this provider. \
             Each resource and data source will document the permissions (Bot Token Scopes) \
             required to perform that operation.\n",
        )
        .attribute(
            "token",
            Attribute::optional(AttributeType::String)
                .sensitive()
                .describe("Slack API Token. This can also be set by configuring the `SLACK_TOKEN` environment variable."),
        )
    }

    /// Build the Slack client from the provider block and check the token works.
    pub async fn configure(&self, config: Value) -> Result<ConfiguredProvider, Diagnostics> {
        let config: ProviderConfig = decode(config)?;

        let token = config.resolve_token().map_err(configure_error)?;
        let client = SlackClient::new(token, &self.options).map_err(configure_error)?;
        let identity = client.auth_test().await.map_err(configure_error)?;

        info!(
            team = %identity.team,
            user = %identity.user,
            version = %self.version,
            "configured slack provider"
        );
        Ok(ConfiguredProvider::new(Arc::new(client)))
    }
}

fn configure_error(err: Error) -> Diagnostics {
    Diagnostic::error(
        "Unable to Configure Slack Client",
        format!(
            "An unexpected error occurred when testing the slack API. \
             If the error is not clear, please contact the provider developers.\n\n\
             Slack Client Error: {}",
            err
        ),
    )
    .into()
}

/// A provider with a working client, ready to serve requests.
pub struct ConfiguredProvider {
    resources: BTreeMap<String, Box<dyn Resource>>,
    data_sources: BTreeMap<String, Box<dyn DataSource>>,
}

impl ConfiguredProvider {
    /// Register every resource and data source against `api`.
    pub fn new(api: Arc<dyn SlackApi>) -> Self {
        let resources: Vec<Box<dyn Resource>> = vec![
            Box::new(ChannelResource::new(api.clone())),
            Box::new(UserGroupResource::new(api.clone())),
        ];
        let data_sources: Vec<Box<dyn DataSource>> = vec![
            Box::new(ChannelDataSource::new(api.clone())),
            Box::new(ChannelMembersDataSource::new(api.clone())),
            Box::new(UserDataSource::new(api.clone())),
            Box::new(UserGroupDataSource::new(api)),
        ];

        Self {
            resources: resources
                .into_iter()
                .map(|r| (type_name(TYPE_NAME, r.type_suffix()), r))
                .collect(),
            data_sources: data_sources
                .into_iter()
                .map(|d| (type_name(TYPE_NAME, d.type_suffix()), d))
                .collect(),
        }
    }

    pub fn resource(&self, type_name: &str) -> Option<&dyn Resource> {
        self.resources.get(type_name).map(Box::as_ref)
    }

    pub fn data_source(&self, type_name: &str) -> Option<&dyn DataSource> {
        self.data_sources.get(type_name).map(Box::as_ref)
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn data_source_types(&self) -> impl Iterator<Item = &str> {
        self.data_sources.keys().map(String::as_str)
    }

    /// Validate `config` against the data source's validators, then read it.
    pub async fn read_data_source(
        &self,
        type_name: &str,
        cancel: &CancellationToken,
        config: Value,
    ) -> Result<Value, Diagnostics> {
        let source = self
            .data_source(type_name)
            .ok_or_else(|| unknown_type("data source", type_name))?;

        validate_config(&source.config_validators(), &config).into_result()?;
        debug!(type_name, "reading data source");
        source.read(cancel, config).await
    }
}

fn unknown_type(kind: &str, type_name: &str) -> Diagnostics {
    Diagnostic::error(
        "Unknown Type",
        format!("The slack provider has no {} named {:?}.", kind, type_name),
    )
    .into()
}
