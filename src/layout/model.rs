use crate::component::{ComponentType, FormComponent, FormContainer, FormItem, JsonObject};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Id of the implicit root container of every layout.
pub const BASE_CONTAINER_ID: &str = "__base__";

/// The normalized in-memory representation of one form page.
///
/// Items live in two flat maps; the tree itself is described by `order`, an adjacency
/// list from container id (including `BASE_CONTAINER_ID`) to the ordered child ids.
/// The base container has an `order` entry but no record in `containers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalLayout {
    pub components: AHashMap<String, FormComponent>,
    pub containers: AHashMap<String, FormContainer>,
    pub order: AHashMap<String, Vec<String>>,
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Unknown root-level fields of the layout file.
    #[serde(default)]
    pub custom_root_properties: JsonObject,
    /// Unknown fields of the layout file's `data` object (e.g. `hidden`).
    #[serde(default)]
    pub custom_data_properties: JsonObject,
    /// Flat id sequence of the file this layout was loaded from.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_sequence: Vec<String>,
}

/// Page name -> layout.
pub type FormLayouts = AHashMap<String, InternalLayout>;

impl Default for InternalLayout {
    fn default() -> Self {
        Self::empty()
    }
}

impl InternalLayout {
    /// A layout with nothing but an empty base container.
    pub fn empty() -> Self {
        let mut order = AHashMap::new();
        order.insert(BASE_CONTAINER_ID.to_string(), Vec::new());
        Self {
            components: AHashMap::new(),
            containers: AHashMap::new(),
            order,
            schema: None,
            custom_root_properties: JsonObject::new(),
            custom_data_properties: JsonObject::new(),
            external_sequence: Vec::new(),
        }
    }

    /// The children of a container. Missing entries read as empty.
    pub fn children(&self, container_id: &str) -> &[String] {
        self.order
            .get(container_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True for the base container and every container record.
    pub fn has_container(&self, container_id: &str) -> bool {
        container_id == BASE_CONTAINER_ID || self.containers.contains_key(container_id)
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.components.contains_key(item_id) || self.containers.contains_key(item_id)
    }

    pub fn component_type_of(&self, item_id: &str) -> Option<&ComponentType> {
        self.components
            .get(item_id)
            .map(|c| &c.component_type)
            .or_else(|| self.containers.get(item_id).map(|c| &c.component_type))
    }

    pub fn get_item(&self, item_id: &str) -> Option<FormItem> {
        if let Some(component) = self.components.get(item_id) {
            return Some(FormItem::Component(component.clone()));
        }
        self.containers
            .get(item_id)
            .map(|container| FormItem::Container(container.clone()))
    }

    pub(crate) fn page_index_of(&self, item_id: &str) -> Option<u32> {
        self.components
            .get(item_id)
            .and_then(|c| c.page_index)
            .or_else(|| self.containers.get(item_id).and_then(|c| c.page_index))
    }

    pub(crate) fn set_page_index(&mut self, item_id: &str, page_index: Option<u32>) {
        if let Some(component) = self.components.get_mut(item_id) {
            component.page_index = page_index;
        } else if let Some(container) = self.containers.get_mut(item_id) {
            container.page_index = page_index;
        }
    }

    /// Number of items, excluding the base container.
    pub fn len(&self) -> usize {
        self.components.len() + self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
