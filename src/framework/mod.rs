//! Provider framework boundary
//!
//! The Terraform plugin protocol server (handshake, plan diffing, wire
//! encoding) lives outside this crate. What it calls into is defined here:
//! resources and data sources that take and return JSON objects shaped by
//! their [`Schema`], reporting problems as [`Diagnostics`].

mod diagnostics;
mod schema;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

pub use diagnostics::{Diagnostic, Diagnostics};
pub use schema::{Attribute, AttributeType, ConfigValidator, PlanModifier, Schema};


/// A managed resource with full lifecycle.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Suffix appended to the provider type name, e.g. `"_channel"`.
    fn type_suffix(&self) -> &'static str;

    fn schema(&self) -> Schema;

    async fn create(&self, cancel: &CancellationToken, plan: Value) -> Result<Value, Diagnostics>;

    async fn read(&self, cancel: &CancellationToken, state: Value) -> Result<Value, Diagnostics>;

    async fn update(
        &self,
        cancel: &CancellationToken,
        plan: Value,
        state: Value,
    ) -> Result<Value, Diagnostics>;

    async fn delete(&self, cancel: &CancellationToken, state: Value) -> Result<(), Diagnostics>;

    /// Seed state from an import id. The follow-up read fills the rest.
    fn import_state(&self, id: &str) -> Result<Value, Diagnostics> {
        import_passthrough_id(id)
    }
}

/// A read-only data source.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn type_suffix(&self) -> &'static str;

    fn schema(&self) -> Schema;

    fn config_validators(&self) -> Vec<ConfigValidator> {
        Vec::new()
    }

    async fn read(&self, cancel: &CancellationToken, config: Value) -> Result<Value, Diagnostics>;
}

/// Full type name as Terraform sees it (`slack` + `_channel`).
pub fn type_name(provider_type_name: &str, suffix: &str) -> String {
    format!("{}{}", provider_type_name, suffix)
}

/// Run every validator against `config`, collecting all diagnostics.
pub fn validate_config(validators: &[ConfigValidator], config: &Value) -> Diagnostics {
    let mut diags = Diagnostics::new();
    for validator in validators {
        diags.extend(validator.validate(config));
    }
    diags
}

/// Import by putting the given id into the `id` attribute.
pub fn import_passthrough_id(id: &str) -> Result<Value, Diagnostics> {
    if id.is_empty() {
        return Err(Diagnostic::error(
            "Missing Resource Import Identifier",
            "The import identifier must not be empty.",
        )
        .into());
    }
    Ok(json!({ "id": id }))
}

/// Decode a plan/state/config object into a typed model.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Diagnostics> {
    serde_json::from_value(value).map_err(|e| {
        Diagnostic::error(
            "Value Conversion Error",
            format!("Unable to read Terraform data into the model: {}", e),
        )
        .into()
    })
}

/// Encode a typed model back into a state object.
pub fn encode<T: Serialize>(model: &T) -> Result<Value, Diagnostics> {
    serde_json::to_value(model).map_err(|e| {
        Diagnostic::error(
            "Value Conversion Error",
            format!("Unable to write the model into Terraform state: {}", e),
        )
        .into()
    })
}

/// Decode a plan after filling schema defaults for omitted attributes.
pub fn decode_planned<T: DeserializeOwned>(schema: &Schema, mut plan: Value) -> Result<T, Diagnostics> {
    if let Some(object) = plan.as_object_mut() {
        schema.apply_defaults(object);
    }
    decode(plan)
}

/// `#[serde(deserialize_with)]` helper: a null attribute reads as `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
