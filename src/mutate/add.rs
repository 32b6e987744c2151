use crate::component::{ComponentType, FormComponent, FormContainer, FormItem, generate_form_item};
use crate::layout::{BASE_CONTAINER_ID, InternalLayout};
use tracing::{debug, warn};

/// Clamps an optional insert position to the length of a container. `None` means the end.
pub(super) fn insert_position(position: Option<usize>, len: usize) -> usize {
    position.map_or(len, |p| p.min(len))
}

/// Page index for an item inserted into a multi-page repeating group.
///
/// Page indices are not managed by the editor, so a new item inherits the page of the
/// item right before it, or the first page when it is placed at the front.
pub(super) fn calculate_new_page_index(
    layout: &InternalLayout,
    container_id: &str,
    position: Option<usize>,
) -> Option<u32> {
    let parent = layout.containers.get(container_id)?;
    if !parent.is_multi_page() {
        return None;
    }
    let siblings = layout.children(container_id);
    let position = insert_position(position, siblings.len());
    if position == 0 {
        return Some(0);
    }
    layout.page_index_of(&siblings[position - 1])
}

fn can_insert(layout: &InternalLayout, id: &str, container_id: &str) -> bool {
    if !layout.has_container(container_id) {
        warn!(container = %container_id, item = %id, "Target container does not exist, nothing added");
        return false;
    }
    if id == BASE_CONTAINER_ID || layout.contains(id) {
        warn!(item = %id, "An item with this id already exists, nothing added");
        return false;
    }
    true
}

/// Adds a component to a container (default: the base container) at `position` (default: the end).
/// Returns an unchanged copy when the container does not exist or the id is taken.
pub fn add_component(
    layout: &InternalLayout,
    mut component: FormComponent,
    container_id: Option<&str>,
    position: Option<usize>,
) -> InternalLayout {
    let container_id = container_id.unwrap_or(BASE_CONTAINER_ID);
    let mut new_layout = layout.clone();
    if !can_insert(layout, &component.id, container_id) {
        return new_layout;
    }

    component.page_index = calculate_new_page_index(layout, container_id, position);
    let id = component.id.clone();
    let siblings = new_layout
        .order
        .entry(container_id.to_string())
        .or_default();
    let index = insert_position(position, siblings.len());
    siblings.insert(index, id.clone());
    new_layout.components.insert(id.clone(), component);
    debug!(component = %id, container = %container_id, index, "Added component");
    new_layout
}

/// Adds a container, with an empty child list, to a parent container.
pub fn add_container(
    layout: &InternalLayout,
    mut container: FormContainer,
    parent_id: Option<&str>,
    position: Option<usize>,
) -> InternalLayout {
    let parent_id = parent_id.unwrap_or(BASE_CONTAINER_ID);
    let mut new_layout = layout.clone();
    if !can_insert(layout, &container.id, parent_id) {
        return new_layout;
    }

    container.page_index = calculate_new_page_index(layout, parent_id, position);
    let id = container.id.clone();
    let siblings = new_layout.order.entry(parent_id.to_string()).or_default();
    let index = insert_position(position, siblings.len());
    siblings.insert(index, id.clone());
    new_layout.order.insert(id.clone(), Vec::new());
    new_layout.containers.insert(id.clone(), container);
    debug!(container = %id, parent = %parent_id, index, "Added container");
    new_layout
}

/// Creates an item from the defaults of `component_type` and adds it to the layout.
///
/// Whether the type may be placed inside `parent_id` is not checked here; see
/// [`crate::validate::check_add`].
pub fn add_item_of_type(
    layout: &InternalLayout,
    component_type: &ComponentType,
    id: &str,
    parent_id: Option<&str>,
    position: Option<usize>,
) -> InternalLayout {
    match generate_form_item(component_type, id) {
        FormItem::Container(container) => add_container(layout, container, parent_id, position),
        FormItem::Component(component) => add_component(layout, component, parent_id, position),
    }
}

/// Appends a navigation buttons component to the end of the base container.
pub fn add_navigation_buttons(layout: &InternalLayout, id: &str) -> InternalLayout {
    add_item_of_type(layout, &ComponentType::NavigationButtons, id, None, None)
}
