use super::external::{ExternalComponent, ExternalFormLayout, ExternalLayoutData};
use super::to_internal::CHILDREN;
use crate::layout::{BASE_CONTAINER_ID, InternalLayout};
use ahash::{AHashMap, AHashSet};
use serde_json::Value;

/// Flattens the tree into the backend's ordered array format.
///
/// Each container's `children` list is recomputed from `order`. The array keeps the
/// sequence the layout was loaded with as long as that sequence still describes the same
/// tree; otherwise items are emitted in pre-order starting from the base container.
pub fn internal_to_external(layout: &InternalLayout) -> ExternalFormLayout {
    let sequence = preserved_sequence(layout).unwrap_or_else(|| canonical_sequence(layout));

    let elements = sequence
        .iter()
        .filter_map(|id| to_external_component(layout, id))
        .collect();

    ExternalFormLayout {
        schema: layout.schema.clone(),
        data: ExternalLayoutData {
            layout: elements,
            custom_properties: layout.custom_data_properties.clone(),
        },
        custom_properties: layout.custom_root_properties.clone(),
    }
}

impl From<&InternalLayout> for ExternalFormLayout {
    fn from(layout: &InternalLayout) -> Self {
        internal_to_external(layout)
    }
}

fn to_external_component(layout: &InternalLayout, id: &str) -> Option<ExternalComponent> {
    if let Some(component) = layout.components.get(id) {
        return Some(ExternalComponent {
            id: component.id.clone(),
            component_type: component.component_type.clone(),
            properties: component.to_properties(),
        });
    }
    let container = layout.containers.get(id)?;
    let multi_page = container.is_multi_page();
    let children = layout
        .children(id)
        .iter()
        .map(|child_id| match layout.page_index_of(child_id) {
            Some(page_index) if multi_page => Value::String(format!("{}:{}", page_index, child_id)),
            _ => Value::String(child_id.clone()),
        })
        .collect();
    let mut properties = container.to_properties();
    properties.insert(CHILDREN.to_string(), Value::Array(children));
    Some(ExternalComponent {
        id: container.id.clone(),
        component_type: container.component_type.clone(),
        properties,
    })
}

/// Pre-order walk from the base container. Each item is emitted once.
fn canonical_sequence(layout: &InternalLayout) -> Vec<String> {
    let mut sequence = Vec::with_capacity(layout.len());
    let mut visited = AHashSet::new();
    walk(layout, BASE_CONTAINER_ID, &mut sequence, &mut visited);
    sequence
}

fn walk(
    layout: &InternalLayout,
    container_id: &str,
    sequence: &mut Vec<String>,
    visited: &mut AHashSet<String>,
) {
    for child_id in layout.children(container_id) {
        if !layout.contains(child_id) || !visited.insert(child_id.clone()) {
            continue;
        }
        sequence.push(child_id.clone());
        if layout.containers.contains_key(child_id) {
            walk(layout, child_id, sequence, visited);
        }
    }
}

/// Returns the loaded sequence, minus removed items, if it still parses back into the
/// current tree: every item appears exactly once, and the top-level items appear in the
/// order of the base container.
fn preserved_sequence(layout: &InternalLayout) -> Option<Vec<String>> {
    if layout.external_sequence.is_empty() {
        return None;
    }

    let mut parent_of: AHashMap<&str, &str> = AHashMap::new();
    for (parent_id, children) in layout.order.iter() {
        for child_id in children {
            if parent_of.insert(child_id.as_str(), parent_id.as_str()).is_some() {
                return None;
            }
        }
    }

    let sequence: Vec<String> = layout
        .external_sequence
        .iter()
        .filter(|id| layout.contains(id))
        .cloned()
        .collect();
    let unique: AHashSet<&str> = sequence.iter().map(String::as_str).collect();
    if unique.len() != sequence.len() || sequence.len() != layout.len() {
        return None;
    }
    if sequence.iter().any(|id| !parent_of.contains_key(id.as_str())) {
        return None;
    }

    let top_level: Vec<&str> = sequence
        .iter()
        .map(String::as_str)
        .filter(|id| parent_of.get(id) == Some(&BASE_CONTAINER_ID))
        .collect();
    let base_order: Vec<&str> = layout
        .children(BASE_CONTAINER_ID)
        .iter()
        .map(String::as_str)
        .collect();
    (top_level == base_order).then_some(sequence)
}
