use super::external::{ExternalComponent, ExternalFormLayout};
use crate::component::{ComponentType, FormComponent, FormContainer, JsonObject, is_container_type};
use crate::error::ConversionError;
use crate::layout::{BASE_CONTAINER_ID, InternalLayout};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use serde_json::Value;
use tracing::warn;

pub(super) const CHILDREN: &str = "children";

/// Splits a multi-page child reference (`"<pageIndex>:<id>"`) into its parts.
pub(super) fn split_page_reference(reference: &str) -> (Option<u32>, &str) {
    if let Some((prefix, id)) = reference.split_once(':') {
        if !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(page_index) = prefix.parse() {
                return (Some(page_index), id);
            }
        }
    }
    (None, reference)
}

fn is_multi_page(properties: &JsonObject) -> bool {
    properties
        .get("edit")
        .and_then(|edit| edit.get("multiPage"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// A container element of the flat array, with its child references resolved.
struct ParsedContainer<'a> {
    element: &'a ExternalComponent,
    children: Vec<(Option<u32>, String)>,
}

fn parse_children(element: &ExternalComponent) -> Vec<(Option<u32>, String)> {
    let multi_page = element.component_type == ComponentType::RepeatingGroup
        && is_multi_page(&element.properties);
    let Some(Value::Array(children)) = element.properties.get(CHILDREN) else {
        return Vec::new();
    };
    children
        .iter()
        .filter_map(|child| match child.as_str() {
            Some(reference) if multi_page => {
                let (page_index, id) = split_page_reference(reference);
                Some((page_index, id.to_string()))
            }
            Some(reference) => Some((None, reference.to_string())),
            None => {
                warn!(container = %element.id, "Ignoring non-string child reference {}", child);
                None
            }
        })
        .collect()
}

/// Converts a layout file into the internal tree model.
///
/// `None` stands for a page without layout data and yields an empty layout.
pub fn external_to_internal(
    external: Option<&ExternalFormLayout>,
) -> Result<InternalLayout, ConversionError> {
    let Some(external) = external else {
        return Ok(InternalLayout::empty());
    };
    let elements = &external.data.layout;

    let duplicates: Vec<String> = elements
        .iter()
        .map(|e| e.id.as_str())
        .duplicates()
        .map(str::to_string)
        .sorted()
        .collect();
    if !duplicates.is_empty() {
        return Err(ConversionError::DuplicateIds(duplicates));
    }

    let defined: AHashSet<&str> = elements.iter().map(|e| e.id.as_str()).collect();

    let parsed: Vec<ParsedContainer> = elements
        .iter()
        .filter(|e| is_container_type(&e.component_type))
        .map(|element| ParsedContainer {
            element,
            children: parse_children(element),
        })
        .collect();

    let mut layout = InternalLayout::empty();
    let mut parent_of: AHashMap<String, String> = AHashMap::new();
    let mut page_indices: AHashMap<String, u32> = AHashMap::new();

    for container in &parsed {
        let container_id = &container.element.id;
        let mut order = Vec::with_capacity(container.children.len());
        for (page_index, child_id) in &container.children {
            if !defined.contains(child_id.as_str()) {
                warn!(container = %container_id, child = %child_id, "Dropping reference to undefined component");
                continue;
            }
            if child_id == container_id || parent_of.contains_key(child_id) {
                warn!(container = %container_id, child = %child_id, "Dropping duplicate child reference");
                continue;
            }
            parent_of.insert(child_id.clone(), container_id.clone());
            if let Some(page_index) = page_index {
                page_indices.insert(child_id.clone(), *page_index);
            }
            order.push(child_id.clone());
        }
        layout.order.insert(container_id.clone(), order);
    }

    let base_order: Vec<String> = elements
        .iter()
        .filter(|e| !parent_of.contains_key(&e.id))
        .map(|e| e.id.clone())
        .collect();
    layout.order.insert(BASE_CONTAINER_ID.to_string(), base_order);

    for element in elements {
        let mut properties = element.properties.clone();
        if is_container_type(&element.component_type) {
            properties.remove(CHILDREN);
            let mut container =
                FormContainer::from_parts(element.id.clone(), element.component_type.clone(), properties);
            container.page_index = page_indices.get(&element.id).copied();
            layout.containers.insert(element.id.clone(), container);
        } else {
            let mut component =
                FormComponent::from_parts(element.id.clone(), element.component_type.clone(), properties);
            component.page_index = page_indices.get(&element.id).copied();
            layout.components.insert(element.id.clone(), component);
        }
    }

    let reachable: AHashSet<String> =
        crate::layout::get_all_descendants(&layout, BASE_CONTAINER_ID)
            .into_iter()
            .collect();
    let unreachable: Vec<String> = elements
        .iter()
        .filter(|e| !reachable.contains(&e.id))
        .map(|e| e.id.clone())
        .sorted()
        .collect();
    if !unreachable.is_empty() {
        return Err(ConversionError::UnreachableItems(unreachable));
    }

    layout.schema = external.schema.clone();
    layout.custom_root_properties = external.custom_properties.clone();
    layout.custom_data_properties = external.data.custom_properties.clone();
    layout.external_sequence = elements.iter().map(|e| e.id.clone()).collect();
    Ok(layout)
}

impl TryFrom<&ExternalFormLayout> for InternalLayout {
    type Error = ConversionError;

    fn try_from(external: &ExternalFormLayout) -> Result<Self, Self::Error> {
        external_to_internal(Some(external))
    }
}
