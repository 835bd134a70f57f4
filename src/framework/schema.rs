//! Declarative schemas for the provider, resources and data sources

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::diagnostics::{Diagnostic, Diagnostics};

/// Terraform value type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Bool,
    /// Set of strings
    StringSet,
}

/// Plan-time behavior attached to an attribute
#[derive(Debug, Clone, Copy)]
pub enum PlanModifier {
    /// Keep the prior state value instead of showing "(known after apply)".
    UseStateForUnknown,
    /// Force replacement when `check(state, plan)` is true.
    RequiresReplaceIf {
        description: &'static str,
        check: fn(&Value, &Value) -> bool,
    },
}

impl PlanModifier {
    /// Whether this modifier forces replacement for the given transition.
    pub fn requires_replace(&self, state: &Value, plan: &Value) -> bool {
        match self {
            Self::UseStateForUnknown => false,
            Self::RequiresReplaceIf { check, .. } => check(state, plan),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Attribute {
    pub ty: AttributeType,
    pub description: &'static str,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub default: Option<Value>,
    pub plan_modifiers: Vec<PlanModifier>,
}

impl Attribute {
    fn new(ty: AttributeType) -> Self {
        Self {
            ty,
            description: "",
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            default: None,
            plan_modifiers: Vec::new(),
        }
    }

    pub fn required(ty: AttributeType) -> Self {
        Self {
            required: true,
            ..Self::new(ty)
        }
    }

    pub fn optional(ty: AttributeType) -> Self {
        Self {
            optional: true,
            ..Self::new(ty)
        }
    }

    pub fn computed(ty: AttributeType) -> Self {
        Self {
            computed: true,
            ..Self::new(ty)
        }
    }

    /// Optional and, when omitted, filled in by the provider.
    pub fn optional_computed(ty: AttributeType) -> Self {
        Self {
            optional: true,
            computed: true,
            ..Self::new(ty)
        }
    }

    #[must_use]
    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub fn with_plan_modifier(mut self, modifier: PlanModifier) -> Self {
        self.plan_modifiers.push(modifier);
        self
    }
}

/// Attribute set plus markdown documentation
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub description: String,
    pub attributes: BTreeMap<&'static str, Attribute>,
}

impl Schema {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            attributes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn attribute(mut self, name: &'static str, attribute: Attribute) -> Self {
        self.attributes.insert(name, attribute);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Fill defaults for attributes missing or null in `object`.
    pub fn apply_defaults(&self, object: &mut Map<String, Value>) {
        for (name, attribute) in &self.attributes {
            if let Some(default) = &attribute.default {
                let entry = object.entry(name.to_string()).or_insert(Value::Null);
                if entry.is_null() {
                    *entry = default.clone();
                }
            }
        }
    }

    /// Attribute names whose plan modifiers demand replacement.
    pub fn requires_replace(&self, state: &Value, plan: &Value) -> Vec<&'static str> {
        self.attributes
            .iter()
            .filter(|(name, attribute)| {
                let s = state.get(**name).unwrap_or(&Value::Null);
                let p = plan.get(**name).unwrap_or(&Value::Null);
                attribute
                    .plan_modifiers
                    .iter()
                    .any(|m| m.requires_replace(s, p))
            })
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Cross-attribute checks run before a data source read
#[derive(Debug, Clone, Copy)]
pub enum ConfigValidator {
    /// At most one of these attributes may be set.
    Conflicting(&'static [&'static str]),
}

impl ConfigValidator {
    pub fn validate(&self, config: &Value) -> Diagnostics {
        let mut diags = Diagnostics::new();
        match self {
            Self::Conflicting(names) => {
                let set: Vec<&str> = names
                    .iter()
                    .copied()
                    .filter(|n| config.get(*n).is_some_and(|v| !v.is_null()))
                    .collect();
                if set.len() > 1 {
                    diags.push(
                        Diagnostic::error(
                            "Invalid Attribute Combination",
                            format!(
                                "These attributes cannot be configured together: [{}]",
                                set.join(",")
                            ),
                        )
                        .at(set[0]),
                    );
                }
            }
        }
        diags
    }
}
