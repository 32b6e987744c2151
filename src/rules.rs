//! `RuleConfiguration.json`: calculation rules and conditional rendering.
//!
//! Both kinds of rule point at form items by id, so renaming or removing an item has to
//! be reflected here. The editor only does that after the layout itself has been saved.

use crate::component::JsonObject;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A rule whose parameters are bound to fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConnection {
    #[serde(default)]
    pub input_params: AHashMap<String, Value>,
    #[serde(default)]
    pub out_params: AHashMap<String, Value>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// A rule that shows or hides a set of form items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalRendering {
    #[serde(default)]
    pub input_params: AHashMap<String, Value>,
    #[serde(default)]
    pub selected_fields: AHashMap<String, Value>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConfigData {
    #[serde(default)]
    pub rule_connection: AHashMap<String, RuleConnection>,
    #[serde(default)]
    pub conditional_rendering: AHashMap<String, ConditionalRendering>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default)]
    pub data: RuleConfigData,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl RuleConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn is_empty(&self) -> bool {
        self.data.rule_connection.is_empty() && self.data.conditional_rendering.is_empty()
    }

    fn all_params_mut(&mut self) -> impl Iterator<Item = &mut AHashMap<String, Value>> {
        let connections = self
            .data
            .rule_connection
            .values_mut()
            .flat_map(|rule| [&mut rule.input_params, &mut rule.out_params]);
        let rendering = self
            .data
            .conditional_rendering
            .values_mut()
            .flat_map(|rule| [&mut rule.input_params, &mut rule.selected_fields]);
        connections.chain(rendering)
    }
}

fn points_at(value: &Value, id: &str) -> bool {
    value.as_str() == Some(id)
}

/// Rewrites every parameter and selected field that points at `old_id`.
///
/// Returns the number of rewritten references.
pub fn switch_selected_field_id(config: &mut RuleConfig, old_id: &str, new_id: &str) -> usize {
    let mut switched = 0;
    for params in config.all_params_mut() {
        for value in params.values_mut().filter(|v| points_at(v, old_id)) {
            *value = Value::String(new_id.to_string());
            switched += 1;
        }
    }
    switched
}

/// Drops the selected fields that point at a removed item.
pub fn remove_field_references(config: &mut RuleConfig, id: &str) -> usize {
    let mut removed = 0;
    for rule in config.data.conditional_rendering.values_mut() {
        let before = rule.selected_fields.len();
        rule.selected_fields.retain(|_, value| !points_at(value, id));
        removed += before - rule.selected_fields.len();
    }
    removed
}
