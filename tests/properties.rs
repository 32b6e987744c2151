//! Property tests: random edit sequences must keep the tree consistent and convertible.
mod common;
use proptest::prelude::*;
use serde_json::{Value, json};
use studio_layout::layout::all_item_ids;
use studio_layout::prelude::*;

#[derive(Debug, Clone)]
enum Edit {
    Add { parent: usize, position: usize, container: bool },
    Remove { item: usize },
    Move { item: usize, target: usize, position: usize },
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        3 => (any::<usize>(), any::<usize>(), any::<bool>())
            .prop_map(|(parent, position, container)| Edit::Add { parent, position, container }),
        1 => any::<usize>().prop_map(|item| Edit::Remove { item }),
        2 => (any::<usize>(), any::<usize>(), any::<usize>())
            .prop_map(|(item, target, position)| Edit::Move { item, target, position }),
    ]
}

fn container_ids(layout: &InternalLayout) -> Vec<String> {
    let mut ids: Vec<String> = layout.containers.keys().cloned().collect();
    ids.sort();
    ids.insert(0, BASE_CONTAINER_ID.to_string());
    ids
}

fn item_ids(layout: &InternalLayout) -> Vec<String> {
    let mut ids = all_item_ids(layout);
    ids.sort();
    ids
}

fn apply(edits: &[Edit]) -> InternalLayout {
    let mut layout = InternalLayout::empty();
    for (n, edit) in edits.iter().enumerate() {
        layout = match *edit {
            Edit::Add { parent, position, container } => {
                let parents = container_ids(&layout);
                let parent = &parents[parent % parents.len()];
                let component_type = if container {
                    ComponentType::Group
                } else {
                    ComponentType::Input
                };
                let position = position % (layout.children(parent).len() + 1);
                add_item_of_type(
                    &layout,
                    &component_type,
                    &format!("item-{n}"),
                    Some(parent),
                    Some(position),
                )
            }
            Edit::Remove { item } => {
                let items = item_ids(&layout);
                if items.is_empty() {
                    continue;
                }
                remove_component(&layout, &items[item % items.len()])
            }
            Edit::Move { item, target, position } => {
                let items = item_ids(&layout);
                if items.is_empty() {
                    continue;
                }
                let targets = container_ids(&layout);
                let item = &items[item % items.len()];
                let target = &targets[target % targets.len()];
                move_layout_item(&layout, item, target, position % 8).unwrap_or(layout)
            }
        };
    }
    layout
}

/// One element of a generated layout file: (kind, parent pick, page, required, array slot).
/// Kinds: 0 Input, 1 a type unknown to the editor, 2 Group, 3 multi-page RepeatingGroup.
type ElementSpec = (u8, usize, u32, bool, u32);

fn element_specs() -> impl Strategy<Value = Vec<ElementSpec>> {
    prop::collection::vec(
        (0u8..4, any::<usize>(), 0u32..3, any::<bool>(), any::<u32>()),
        1..14,
    )
}

/// Builds a well-formed layout file: every item has at most one parent, parents are
/// containers, and the array is shuffled so children may come before their container.
fn build_external(specs: &[ElementSpec]) -> ExternalFormLayout {
    let ids: Vec<String> = (0..specs.len()).map(|i| format!("item-{i}")).collect();
    let mut children: Vec<Vec<String>> = vec![Vec::new(); specs.len()];
    let mut containers = Vec::new();
    for (i, &(kind, parent, page, _, _)) in specs.iter().enumerate() {
        let pick = parent % (containers.len() + 1);
        if pick > 0 {
            let parent: usize = containers[pick - 1];
            let reference = if specs[parent].0 == 3 {
                format!("{page}:{}", ids[i])
            } else {
                ids[i].clone()
            };
            children[parent].push(reference);
        }
        if kind >= 2 {
            containers.push(i);
        }
    }

    let mut elements: Vec<(u32, usize, ExternalComponent)> = specs
        .iter()
        .enumerate()
        .map(|(i, &(kind, _, _, required, slot))| {
            let component_type = match kind {
                0 => ComponentType::Input,
                1 => ComponentType::from("CustomWidget"),
                2 => ComponentType::Group,
                _ => ComponentType::RepeatingGroup,
            };
            let mut element = ExternalComponent::new(&ids[i], component_type);
            if kind >= 2 {
                let refs = children[i].iter().cloned().map(Value::String).collect();
                element.properties.insert("children".to_string(), Value::Array(refs));
            } else if required {
                element.properties.insert("required".to_string(), json!(true));
            }
            if kind == 3 {
                element.properties.insert("edit".to_string(), json!({ "multiPage": true }));
            }
            (slot, i, element)
        })
        .collect();
    elements.sort_by_key(|(slot, i, _)| (*slot, *i));
    ExternalFormLayout::new(elements.into_iter().map(|(_, _, e)| e).collect())
}

proptest! {
    #[test]
    fn prop_layout_files_survive_a_round_trip(specs in element_specs()) {
        let external = build_external(&specs);
        let layout = external_to_internal(Some(&external)).unwrap();

        prop_assert!(check_integrity(&layout).is_empty());
        prop_assert_eq!(layout.len(), specs.len());
        prop_assert_eq!(internal_to_external(&layout), external);
    }

    #[test]
    fn prop_edits_preserve_integrity(edits in prop::collection::vec(edit_strategy(), 0..40)) {
        let layout = apply(&edits);
        prop_assert!(check_integrity(&layout).is_empty());
        prop_assert_eq!(item_ids(&layout).len(), layout.len());
    }

    #[test]
    fn prop_conversion_round_trips(edits in prop::collection::vec(edit_strategy(), 0..40)) {
        let layout = apply(&edits);
        let external = internal_to_external(&layout);
        let back = external_to_internal(Some(&external)).unwrap();

        prop_assert_eq!(&back.components, &layout.components);
        prop_assert_eq!(&back.containers, &layout.containers);
        prop_assert_eq!(&back.order, &layout.order);
        // Writing the converted layout again gives the same file.
        prop_assert_eq!(internal_to_external(&back), external);
    }

    #[test]
    fn prop_removal_is_idempotent(
        edits in prop::collection::vec(edit_strategy(), 1..30),
        pick in any::<usize>(),
    ) {
        let layout = apply(&edits);
        let items = item_ids(&layout);
        prop_assume!(!items.is_empty());
        let id = &items[pick % items.len()];

        let once = remove_component(&layout, id);
        let twice = remove_component(&once, id);
        prop_assert_eq!(&once, &twice);
        prop_assert!(!once.contains(id));
        prop_assert!(check_integrity(&once).is_empty());
    }
}
