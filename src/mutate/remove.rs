use crate::component::ComponentType;
use crate::layout::{BASE_CONTAINER_ID, InternalLayout, find_parent_id, get_all_descendants};
use tracing::{debug, warn};

fn detach(layout: &mut InternalLayout, item_id: &str) {
    let parent_id = find_parent_id(layout, item_id).map(str::to_string);
    if let Some(parent_id) = parent_id {
        if let Some(siblings) = layout.order.get_mut(&parent_id) {
            siblings.retain(|id| id != item_id);
        }
    }
}

/// Removes a component and its reference in the order.
///
/// Removing a container id removes the whole container (see [`remove_container`]).
/// Removing an id that is not in the layout returns an unchanged copy.
pub fn remove_component(layout: &InternalLayout, component_id: &str) -> InternalLayout {
    if layout.containers.contains_key(component_id) {
        return remove_container(layout, component_id);
    }
    let mut new_layout = layout.clone();
    if new_layout.components.remove(component_id).is_some() {
        detach(&mut new_layout, component_id);
        debug!(component = %component_id, "Removed component");
    }
    new_layout
}

/// Removes a container together with everything inside it.
pub fn remove_container(layout: &InternalLayout, container_id: &str) -> InternalLayout {
    let mut new_layout = layout.clone();
    if container_id == BASE_CONTAINER_ID {
        warn!("The base container cannot be removed");
        return new_layout;
    }
    if !layout.containers.contains_key(container_id) {
        return new_layout;
    }

    let descendants = get_all_descendants(layout, container_id);
    for id in &descendants {
        new_layout.components.remove(id);
        new_layout.containers.remove(id);
        new_layout.order.remove(id);
    }
    detach(&mut new_layout, container_id);
    new_layout.containers.remove(container_id);
    new_layout.order.remove(container_id);
    debug!(container = %container_id, descendants = descendants.len(), "Removed container");
    new_layout
}

/// Removes several items at once.
pub fn remove_components<S: AsRef<str>>(layout: &InternalLayout, ids: &[S]) -> InternalLayout {
    ids.iter()
        .fold(layout.clone(), |acc, id| remove_component(&acc, id.as_ref()))
}

/// Removes every component of the given type.
pub fn remove_components_by_type(
    layout: &InternalLayout,
    component_type: &ComponentType,
) -> InternalLayout {
    let ids: Vec<String> = layout
        .components
        .values()
        .filter(|c| &c.component_type == component_type)
        .map(|c| c.id.clone())
        .collect();
    remove_components(layout, &ids)
}
