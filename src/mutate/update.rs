use super::add::{calculate_new_page_index, insert_position};
use crate::component::{FormComponent, FormContainer};
use crate::error::LayoutError;
use crate::layout::{BASE_CONTAINER_ID, InternalLayout, find_parent_id, is_same_or_descendant};
use tracing::debug;

fn replace_references(layout: &mut InternalLayout, old_id: &str, new_id: &str) {
    for children in layout.order.values_mut() {
        for child in children.iter_mut().filter(|child| child.as_str() == old_id) {
            *child = new_id.to_string();
        }
    }
    for entry in layout.external_sequence.iter_mut().filter(|e| e.as_str() == old_id) {
        *entry = new_id.to_string();
    }
}

fn ensure_id_available(layout: &InternalLayout, new_id: &str) -> Result<(), LayoutError> {
    if new_id == BASE_CONTAINER_ID || layout.contains(new_id) {
        return Err(LayoutError::IdAlreadyInUse(new_id.to_string()));
    }
    Ok(())
}

/// Renames a component: its key, its own id and every reference in the order.
pub fn update_component_id(
    layout: &InternalLayout,
    old_id: &str,
    new_id: &str,
) -> Result<InternalLayout, LayoutError> {
    if !layout.components.contains_key(old_id) {
        return Err(LayoutError::ItemNotFound(old_id.to_string()));
    }
    if old_id == new_id {
        return Ok(layout.clone());
    }
    ensure_id_available(layout, new_id)?;

    let mut new_layout = layout.clone();
    if let Some(mut component) = new_layout.components.remove(old_id) {
        component.id = new_id.to_string();
        new_layout.components.insert(new_id.to_string(), component);
    }
    replace_references(&mut new_layout, old_id, new_id);
    debug!(old = %old_id, new = %new_id, "Renamed component");
    Ok(new_layout)
}

/// Renames a container: its key, its own id, its reference in the parent's order and
/// the key of its own child list.
pub fn update_container_id(
    layout: &InternalLayout,
    old_id: &str,
    new_id: &str,
) -> Result<InternalLayout, LayoutError> {
    if old_id == BASE_CONTAINER_ID {
        return Err(LayoutError::BaseContainerImmutable("renamed"));
    }
    if !layout.containers.contains_key(old_id) {
        return Err(LayoutError::ContainerNotFound(old_id.to_string()));
    }
    if old_id == new_id {
        return Ok(layout.clone());
    }
    ensure_id_available(layout, new_id)?;

    let mut new_layout = layout.clone();
    if let Some(mut container) = new_layout.containers.remove(old_id) {
        container.id = new_id.to_string();
        new_layout.containers.insert(new_id.to_string(), container);
    }
    let children = new_layout.order.remove(old_id).unwrap_or_default();
    new_layout.order.insert(new_id.to_string(), children);
    replace_references(&mut new_layout, old_id, new_id);
    debug!(old = %old_id, new = %new_id, "Renamed container");
    Ok(new_layout)
}

/// Replaces the record of component `id`, renaming it first if `component.id` differs.
pub fn update_component(
    layout: &InternalLayout,
    id: &str,
    component: FormComponent,
) -> Result<InternalLayout, LayoutError> {
    let mut new_layout = update_component_id(layout, id, &component.id)?;
    new_layout.components.insert(component.id.clone(), component);
    Ok(new_layout)
}

/// Replaces the record of container `id`, renaming it first if `container.id` differs.
pub fn update_container(
    layout: &InternalLayout,
    id: &str,
    container: FormContainer,
) -> Result<InternalLayout, LayoutError> {
    let mut new_layout = update_container_id(layout, id, &container.id)?;
    new_layout.containers.insert(container.id.clone(), container);
    Ok(new_layout)
}

/// Moves an item to `new_index` of `new_parent_id`.
///
/// The ancestor chain of the target is walked first, so a container can never be moved
/// into itself or one of its descendants.
pub fn move_layout_item(
    layout: &InternalLayout,
    id: &str,
    new_parent_id: &str,
    new_index: usize,
) -> Result<InternalLayout, LayoutError> {
    if id == BASE_CONTAINER_ID {
        return Err(LayoutError::BaseContainerImmutable("moved"));
    }
    if !layout.contains(id) {
        return Err(LayoutError::ItemNotFound(id.to_string()));
    }
    if !layout.has_container(new_parent_id) {
        return Err(LayoutError::ContainerNotFound(new_parent_id.to_string()));
    }
    if layout.containers.contains_key(id) && is_same_or_descendant(layout, new_parent_id, id) {
        return Err(LayoutError::CyclicMove {
            item_id: id.to_string(),
            target_id: new_parent_id.to_string(),
        });
    }

    // The page is picked from the neighbours before the item leaves its old place.
    let page_index = calculate_new_page_index(layout, new_parent_id, Some(new_index));
    let mut new_layout = layout.clone();
    let old_parent_id = find_parent_id(layout, id).map(str::to_string);
    if let Some(old_parent_id) = &old_parent_id {
        if let Some(siblings) = new_layout.order.get_mut(old_parent_id) {
            siblings.retain(|child| child != id);
        }
    }

    let siblings = new_layout
        .order
        .entry(new_parent_id.to_string())
        .or_default();
    let index = insert_position(Some(new_index), siblings.len());
    siblings.insert(index, id.to_string());
    new_layout.set_page_index(id, page_index);

    debug!(
        item = %id,
        from = old_parent_id.as_deref().unwrap_or("<none>"),
        to = %new_parent_id,
        index,
        "Moved layout item"
    );
    Ok(new_layout)
}
