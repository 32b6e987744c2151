use super::kind::ComponentType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A free-form JSON object, as found in bindings and type-specific properties.
pub type JsonObject = Map<String, Value>;

const DATA_MODEL_BINDINGS: &str = "dataModelBindings";
const TEXT_RESOURCE_BINDINGS: &str = "textResourceBindings";
const MAX_COUNT: &str = "maxCount";
const TABLE_HEADERS: &str = "tableHeaders";

/// A leaf item of a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormComponent {
    pub id: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    /// Page of a multi-page repeating group the component is shown on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_model_bindings: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_resource_bindings: Option<JsonObject>,
    /// Every other field of the component, kept verbatim.
    #[serde(flatten)]
    pub properties: JsonObject,
}

/// A non-leaf item of a layout. Its children live in the layout's `order`, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormContainer {
    pub id: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_model_bindings: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_headers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_resource_bindings: Option<JsonObject>,
    #[serde(flatten)]
    pub properties: JsonObject,
}

/// Either kind of layout item.
#[derive(Debug, Clone, PartialEq)]
pub enum FormItem {
    Component(FormComponent),
    Container(FormContainer),
}

/// Takes `key` out of `properties` when it holds an object.
fn take_object(properties: &mut JsonObject, key: &str) -> Option<JsonObject> {
    if !matches!(properties.get(key), Some(Value::Object(_))) {
        return None;
    }
    match properties.remove(key) {
        Some(Value::Object(object)) => Some(object),
        _ => None,
    }
}

fn take_u32(properties: &mut JsonObject, key: &str) -> Option<u32> {
    let value = properties
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())?;
    properties.remove(key);
    Some(value)
}

fn take_string_list(properties: &mut JsonObject, key: &str) -> Option<Vec<String>> {
    let list = properties.get(key)?.as_array()?;
    let strings: Option<Vec<String>> = list
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect();
    let strings = strings?;
    properties.remove(key);
    Some(strings)
}

impl FormComponent {
    pub fn new(id: &str, component_type: ComponentType) -> Self {
        Self::from_parts(id.to_string(), component_type, JsonObject::new())
    }

    /// Builds a component from its id, type and the rest of its JSON fields.
    /// Well-typed bindings are lifted into their own fields, anything else stays in `properties`.
    pub fn from_parts(id: String, component_type: ComponentType, mut properties: JsonObject) -> Self {
        let data_model_bindings = take_object(&mut properties, DATA_MODEL_BINDINGS);
        let text_resource_bindings = take_object(&mut properties, TEXT_RESOURCE_BINDINGS);
        Self {
            id,
            component_type,
            page_index: None,
            data_model_bindings,
            text_resource_bindings,
            properties,
        }
    }

    /// The inverse of `from_parts`: all fields except id, type and page index as one JSON object.
    pub fn to_properties(&self) -> JsonObject {
        let mut properties = self.properties.clone();
        if let Some(bindings) = &self.data_model_bindings {
            properties.insert(DATA_MODEL_BINDINGS.to_string(), Value::Object(bindings.clone()));
        }
        if let Some(bindings) = &self.text_resource_bindings {
            properties.insert(
                TEXT_RESOURCE_BINDINGS.to_string(),
                Value::Object(bindings.clone()),
            );
        }
        properties
    }
}

impl FormContainer {
    pub fn new(id: &str, component_type: ComponentType) -> Self {
        Self::from_parts(id.to_string(), component_type, JsonObject::new())
    }

    pub fn from_parts(id: String, component_type: ComponentType, mut properties: JsonObject) -> Self {
        let max_count = take_u32(&mut properties, MAX_COUNT);
        let data_model_bindings = take_object(&mut properties, DATA_MODEL_BINDINGS);
        let table_headers = take_string_list(&mut properties, TABLE_HEADERS);
        let text_resource_bindings = take_object(&mut properties, TEXT_RESOURCE_BINDINGS);
        Self {
            id,
            component_type,
            page_index: None,
            max_count,
            data_model_bindings,
            table_headers,
            text_resource_bindings,
            properties,
        }
    }

    pub fn to_properties(&self) -> JsonObject {
        let mut properties = self.properties.clone();
        if let Some(max_count) = self.max_count {
            properties.insert(MAX_COUNT.to_string(), Value::from(max_count));
        }
        if let Some(bindings) = &self.data_model_bindings {
            properties.insert(DATA_MODEL_BINDINGS.to_string(), Value::Object(bindings.clone()));
        }
        if let Some(headers) = &self.table_headers {
            properties.insert(
                TABLE_HEADERS.to_string(),
                Value::Array(headers.iter().cloned().map(Value::String).collect()),
            );
        }
        if let Some(bindings) = &self.text_resource_bindings {
            properties.insert(
                TEXT_RESOURCE_BINDINGS.to_string(),
                Value::Object(bindings.clone()),
            );
        }
        properties
    }

    /// True for repeating groups whose edit mode spreads the children over several pages.
    pub fn is_multi_page(&self) -> bool {
        self.component_type == ComponentType::RepeatingGroup
            && self
                .properties
                .get("edit")
                .and_then(|edit| edit.get("multiPage"))
                .and_then(Value::as_bool)
                .unwrap_or(false)
    }
}

impl FormItem {
    pub fn id(&self) -> &str {
        match self {
            FormItem::Component(component) => &component.id,
            FormItem::Container(container) => &container.id,
        }
    }

    pub fn component_type(&self) -> &ComponentType {
        match self {
            FormItem::Component(component) => &component.component_type,
            FormItem::Container(container) => &container.component_type,
        }
    }

    pub fn page_index(&self) -> Option<u32> {
        match self {
            FormItem::Component(component) => component.page_index,
            FormItem::Container(container) => container.page_index,
        }
    }

    pub fn set_page_index(&mut self, page_index: Option<u32>) {
        match self {
            FormItem::Component(component) => component.page_index = page_index,
            FormItem::Container(container) => container.page_index = page_index,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, FormItem::Container(_))
    }
}
