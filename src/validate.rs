//! Caller-level checks run before a mutation is applied.
//!
//! The mutators themselves only keep the tree consistent. Whether an edit makes sense
//! for the form (valid child types, nesting depth, id rules) is decided here, and the
//! result is reported as a `ValidationError` the editor can show next to the field.

use crate::component::{ComponentType, FormContainer, is_valid_child};
use crate::config::EditorConfig;
use crate::error::{LayoutError, ValidationError};
use crate::layout::{BASE_CONTAINER_ID, FormLayouts, InternalLayout, get_depth};
use crate::mutate::{add_item_of_type, move_layout_item};
use itertools::Itertools;

const PROBE_ID: &str = "__probe__";

fn check_valid_child(
    layout: &InternalLayout,
    parent_id: &str,
    child_type: &ComponentType,
) -> Result<(), ValidationError> {
    if parent_id == BASE_CONTAINER_ID {
        return Ok(());
    }
    let parent = layout
        .containers
        .get(parent_id)
        .ok_or_else(|| LayoutError::ContainerNotFound(parent_id.to_string()))?;
    if !is_valid_child(&parent.component_type, child_type) {
        return Err(ValidationError::InvalidChild {
            parent_id: parent_id.to_string(),
            child_type: child_type.to_string(),
        });
    }
    Ok(())
}

fn check_depth(layout: &InternalLayout, config: &EditorConfig) -> Result<(), ValidationError> {
    let depth = get_depth(layout);
    if depth > config.max_container_depth {
        return Err(ValidationError::DepthExceeded {
            depth,
            max: config.max_container_depth,
        });
    }
    Ok(())
}

/// Can an item of `child_type` be added to `parent_id`?
pub fn check_add(
    layout: &InternalLayout,
    parent_id: &str,
    child_type: &ComponentType,
    config: &EditorConfig,
) -> Result<(), ValidationError> {
    if !layout.has_container(parent_id) {
        return Err(LayoutError::ContainerNotFound(parent_id.to_string()).into());
    }
    check_valid_child(layout, parent_id, child_type)?;
    let probe = add_item_of_type(layout, child_type, PROBE_ID, Some(parent_id), None);
    check_depth(&probe, config)
}

/// Can `item_id` be moved into `new_parent_id`?
pub fn check_move(
    layout: &InternalLayout,
    item_id: &str,
    new_parent_id: &str,
    config: &EditorConfig,
) -> Result<(), ValidationError> {
    let item_type = layout
        .component_type_of(item_id)
        .ok_or_else(|| LayoutError::ItemNotFound(item_id.to_string()))?;
    check_valid_child(layout, new_parent_id, item_type)?;
    let moved = move_layout_item(layout, item_id, new_parent_id, usize::MAX)?;
    check_depth(&moved, config)
}

fn has_valid_characters(id: &str) -> bool {
    let mut chars = id.chars();
    let starts_well = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
    starts_well
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        && !id.ends_with('-')
}

/// Validates a new id for an item, `old_id` being the item's current id when renaming.
///
/// Ids must be unique across all pages of the layout set, ignoring case.
pub fn validate_component_id(
    new_id: &str,
    old_id: Option<&str>,
    layouts: &FormLayouts,
) -> Result<(), ValidationError> {
    if new_id.trim().is_empty() {
        return Err(ValidationError::EmptyId);
    }
    if !has_valid_characters(new_id) {
        return Err(ValidationError::InvalidIdCharacters(new_id.to_string()));
    }
    for (page, layout) in layouts.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
        let clash = layout
            .components
            .keys()
            .chain(layout.containers.keys())
            .any(|key| key.eq_ignore_ascii_case(new_id) && Some(key.as_str()) != old_id);
        if clash {
            return Err(ValidationError::DuplicateId(new_id.to_string(), page.clone()));
        }
    }
    Ok(())
}

/// A container that declares table headers must declare at least one.
pub fn validate_table_headers(container: &FormContainer) -> Result<(), ValidationError> {
    match &container.table_headers {
        Some(headers) if headers.is_empty() => {
            Err(ValidationError::EmptyTableHeaders(container.id.clone()))
        }
        _ => Ok(()),
    }
}
