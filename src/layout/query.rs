use super::model::{BASE_CONTAINER_ID, FormLayouts, InternalLayout};
use crate::component::ComponentType;
use crate::error::LayoutError;
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;

/// Finds the id of the container that directly holds `item_id`.
pub fn find_parent_id<'a>(layout: &'a InternalLayout, item_id: &str) -> Option<&'a str> {
    layout
        .order
        .iter()
        .find(|(_, children)| children.iter().any(|id| id == item_id))
        .map(|(parent_id, _)| parent_id.as_str())
}

/// Checks if `item_id` is a container of the layout. The base container counts as one.
pub fn is_container(layout: &InternalLayout, item_id: &str) -> bool {
    layout.has_container(item_id)
}

pub fn get_child_ids<'a>(layout: &'a InternalLayout, parent_id: &str) -> &'a [String] {
    layout.children(parent_id)
}

/// Recursively collects every item below `parent_id`, in pre-order.
pub fn get_all_descendants(layout: &InternalLayout, parent_id: &str) -> Vec<String> {
    let mut descendants = Vec::new();
    let mut visited = AHashSet::new();
    collect_descendants(layout, parent_id, &mut descendants, &mut visited);
    descendants
}

fn collect_descendants(
    layout: &InternalLayout,
    parent_id: &str,
    out: &mut Vec<String>,
    visited: &mut AHashSet<String>,
) {
    if !visited.insert(parent_id.to_string()) {
        return;
    }
    for child in layout.children(parent_id) {
        out.push(child.clone());
        if layout.containers.contains_key(child) {
            collect_descendants(layout, child, out, visited);
        }
    }
}

/// Walks from `item_id` up to the base container, returning every ancestor, closest first.
/// Stops if the order contains a loop.
pub fn ancestors(layout: &InternalLayout, item_id: &str) -> Vec<String> {
    let mut chain: Vec<String> = Vec::new();
    let mut current = item_id.to_string();
    while let Some(parent) = find_parent_id(layout, &current) {
        if parent == item_id || chain.iter().any(|id| id == parent) {
            break;
        }
        chain.push(parent.to_string());
        current = parent.to_string();
    }
    chain
}

/// True if `item_id` is `ancestor_id` or sits anywhere below it.
pub fn is_same_or_descendant(layout: &InternalLayout, item_id: &str, ancestor_id: &str) -> bool {
    item_id == ancestor_id || ancestors(layout, item_id).iter().any(|id| id == ancestor_id)
}

pub fn has_sub_containers(layout: &InternalLayout, item_id: &str) -> bool {
    layout.has_container(item_id)
        && layout
            .children(item_id)
            .iter()
            .any(|id| layout.containers.contains_key(id))
}

fn number_of_container_levels(
    layout: &InternalLayout,
    item_id: &str,
    visited: &mut AHashSet<String>,
) -> usize {
    if !layout.containers.contains_key(item_id)
        || !has_sub_containers(layout, item_id)
        || !visited.insert(item_id.to_string())
    {
        return 0;
    }
    let deepest = layout
        .children(item_id)
        .iter()
        .map(|id| number_of_container_levels(layout, id, visited))
        .max()
        .unwrap_or(0);
    1 + deepest
}

/// How many containers are nested inside other containers at the deepest point.
/// A layout without containers, or with only top-level containers, has depth 0.
pub fn get_depth(layout: &InternalLayout) -> usize {
    layout
        .containers
        .keys()
        .map(|id| number_of_container_levels(layout, id, &mut AHashSet::new()))
        .max()
        .unwrap_or(0)
}

pub fn has_navigation_buttons(layout: &InternalLayout) -> bool {
    layout
        .components
        .values()
        .any(|c| c.component_type == ComponentType::NavigationButtons)
}

pub fn has_multi_page_group(layout: &InternalLayout) -> bool {
    layout.containers.values().any(|c| c.is_multi_page())
}

/// True if the item sits inside a container other than the base container,
/// optionally of a given type.
pub fn is_item_child_of_container(
    layout: &InternalLayout,
    item_id: &str,
    container_type: Option<&ComponentType>,
) -> bool {
    match find_parent_id(layout, item_id) {
        None | Some(BASE_CONTAINER_ID) => false,
        Some(parent_id) => match container_type {
            None => true,
            Some(expected) => layout.component_type_of(parent_id) == Some(expected),
        },
    }
}

/// Case-insensitive check for an item id.
pub fn id_exists(id: &str, layout: &InternalLayout) -> bool {
    layout
        .components
        .keys()
        .chain(layout.containers.keys())
        .any(|key| key.eq_ignore_ascii_case(id))
}

/// Every id referenced in the order of the layout.
pub fn all_item_ids(layout: &InternalLayout) -> Vec<String> {
    layout.order.values().flatten().cloned().collect()
}

/// Ids referenced more than once across the order of the layout, sorted.
pub fn get_duplicated_ids(layout: &InternalLayout) -> Vec<String> {
    layout
        .order
        .values()
        .flatten()
        .duplicates()
        .cloned()
        .sorted()
        .collect()
}

pub fn duplicated_ids_exist(layout: &InternalLayout) -> bool {
    !get_duplicated_ids(layout).is_empty()
}

/// Result of a cross-page duplicate search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateReport {
    pub duplicate_layouts: Vec<String>,
    pub duplicate_components: Vec<String>,
}

/// Finds component ids used on more than one page, together with the pages involved.
pub fn find_layouts_containing_duplicate_components(layouts: &FormLayouts) -> DuplicateReport {
    let mut first_seen: AHashMap<&str, &str> = AHashMap::new();
    let mut duplicate_layouts = AHashSet::new();
    let mut duplicate_components = AHashSet::new();

    for (page, layout) in layouts.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
        for id in layout.order.values().flatten() {
            match first_seen.get(id.as_str()) {
                Some(&other_page) if other_page != page.as_str() => {
                    duplicate_layouts.insert(other_page.to_string());
                    duplicate_layouts.insert(page.clone());
                    duplicate_components.insert(id.clone());
                }
                Some(_) => {}
                None => {
                    first_seen.insert(id.as_str(), page.as_str());
                }
            }
        }
    }

    DuplicateReport {
        duplicate_layouts: duplicate_layouts.into_iter().sorted().collect(),
        duplicate_components: duplicate_components.into_iter().sorted().collect(),
    }
}

/// Lists every violation of the layout tree invariants. An empty list means the layout is sound.
pub fn check_integrity(layout: &InternalLayout) -> Vec<LayoutError> {
    let mut errors = Vec::new();

    for key in layout.order.keys().sorted() {
        if !layout.has_container(key) {
            errors.push(LayoutError::ContainerNotFound(key.clone()));
        }
    }

    let counts = layout.order.values().flatten().counts();
    for (id, count) in counts.into_iter().sorted() {
        if !layout.contains(id) {
            errors.push(LayoutError::DanglingReference(id.clone()));
        }
        if count > 1 {
            errors.push(LayoutError::MultipleParents {
                id: id.clone(),
                count,
            });
        }
    }

    let reachable: AHashSet<String> = get_all_descendants(layout, BASE_CONTAINER_ID)
        .into_iter()
        .collect();
    for id in layout
        .components
        .keys()
        .chain(layout.containers.keys())
        .sorted()
    {
        if !reachable.contains(id) {
            errors.push(LayoutError::Unreachable(id.clone()));
        }
    }

    errors
}
