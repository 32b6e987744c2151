use crate::component::{ComponentType, JsonObject};
use crate::error::ConversionError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A layout file as stored by the backend:
/// `{ "$schema", "data": { "layout": [...], "hidden", ... }, ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalFormLayout {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub data: ExternalLayoutData,
    #[serde(flatten)]
    pub custom_properties: JsonObject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalLayoutData {
    #[serde(default)]
    pub layout: Vec<ExternalComponent>,
    /// Everything next to `layout`, e.g. the `hidden` expression.
    #[serde(flatten)]
    pub custom_properties: JsonObject,
}

/// One element of the flat layout array. Containers list their members in `children`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalComponent {
    pub id: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    #[serde(flatten)]
    pub properties: JsonObject,
}

/// Page name -> layout file.
pub type ExternalLayouts = AHashMap<String, ExternalFormLayout>;

/// Page name -> layout file, or why the file could not be read as one.
pub type LoadedLayouts = AHashMap<String, Result<ExternalFormLayout, ConversionError>>;

impl ExternalFormLayout {
    pub fn new(layout: Vec<ExternalComponent>) -> Self {
        Self {
            schema: None,
            data: ExternalLayoutData {
                layout,
                custom_properties: JsonObject::new(),
            },
            custom_properties: JsonObject::new(),
        }
    }

    /// Parses a layout file from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Fills in `$schema` when the file does not declare one.
    pub fn with_default_schema(mut self, url: &str) -> Self {
        if self.schema.is_none() {
            self.schema = Some(url.to_string());
        }
        self
    }
}

impl ExternalComponent {
    pub fn new(id: &str, component_type: ComponentType) -> Self {
        Self {
            id: id.to_string(),
            component_type,
            properties: JsonObject::new(),
        }
    }
}
