//! Tests for the layout mutators and the checks run before them.
mod common;
use common::*;
use serde_json::json;
use studio_layout::config::EditorConfig;
use studio_layout::layout::{find_parent_id, get_depth};
use studio_layout::prelude::*;
use studio_layout::validate::{check_add, check_move, validate_component_id, validate_table_headers};

#[test]
fn test_add_component_into_group_at_front() {
    let layout = layout_with_empty_group();

    let updated = add_component(
        &layout,
        FormComponent::new("Input-1", ComponentType::Input),
        Some("group1"),
        Some(0),
    );

    assert_eq!(updated.children("group1"), ["Input-1"]);
    assert!(updated.components.contains_key("Input-1"));
    // The input is untouched.
    assert!(layout.components.is_empty());
}

#[test]
fn test_add_component_defaults_to_end_of_base() {
    let layout = layout_with_group();
    let updated = add_component(
        &layout,
        FormComponent::new("Paragraph-9", ComponentType::Paragraph),
        None,
        Some(99),
    );
    assert_eq!(updated.children(BASE_CONTAINER_ID).last().unwrap(), "Paragraph-9");
}

#[test]
fn test_add_is_a_noop_for_missing_container_or_taken_id() {
    let layout = layout_with_group();

    let missing = add_component(
        &layout,
        FormComponent::new("x", ComponentType::Input),
        Some("nope"),
        None,
    );
    assert_eq!(missing, layout);

    let taken = add_component(
        &layout,
        FormComponent::new("Input-1", ComponentType::Input),
        None,
        None,
    );
    assert_eq!(taken, layout);
}

#[test]
fn test_add_item_of_type_uses_defaults() {
    let layout = add_item_of_type(
        &InternalLayout::empty(),
        &ComponentType::RepeatingGroup,
        "rep",
        None,
        None,
    );
    let container = &layout.containers["rep"];
    assert_eq!(container.max_count, Some(2));
    assert!(layout.children("rep").is_empty());
    assert!(layout.order.contains_key("rep"));

    let layout = add_navigation_buttons(&layout, "nav");
    let nav = &layout.components["nav"];
    assert_eq!(nav.properties["showBackButton"], json!(true));
    assert_eq!(nav.text_resource_bindings, None);
    assert_eq!(layout.children(BASE_CONTAINER_ID), ["rep", "nav"]);
}

#[test]
fn test_items_in_multi_page_group_inherit_page_index() {
    let layout = InternalLayout::try_from(&parse_page(PAGE_WITH_MULTI_PAGE_GROUP)).unwrap();

    let end = add_component(
        &layout,
        FormComponent::new("field-c", ComponentType::Input),
        Some("repeating"),
        None,
    );
    assert_eq!(end.components["field-c"].page_index, Some(1));

    let front = add_component(
        &layout,
        FormComponent::new("field-d", ComponentType::Input),
        Some("repeating"),
        Some(0),
    );
    assert_eq!(front.components["field-d"].page_index, Some(0));
}

#[test]
fn test_move_within_multi_page_group_keeps_page_of_old_neighbour() {
    let layout = InternalLayout::try_from(&parse_page(PAGE_WITH_MULTI_PAGE_GROUP)).unwrap();

    // field-a sits right before index 1 until it is taken out, so it stays on page 0.
    let updated = move_layout_item(&layout, "field-a", "repeating", 1).unwrap();

    assert_eq!(updated.children("repeating"), ["field-b", "field-a"]);
    assert_eq!(updated.components["field-a"].page_index, Some(0));
    assert_eq!(updated.components["field-b"].page_index, Some(1));
}

#[test]
fn test_remove_container_removes_descendants() {
    let layout = layout_with_group();
    let updated = remove_container(&layout, "group1");

    assert!(!updated.contains("group1"));
    assert!(!updated.contains("Input-1"));
    assert!(!updated.contains("Input-2"));
    assert!(!updated.order.contains_key("group1"));
    assert_eq!(
        updated.children(BASE_CONTAINER_ID),
        ["Header-1", "NavigationButtons-1"]
    );
    assert!(check_integrity(&updated).is_empty());
}

#[test]
fn test_remove_component_handles_containers_and_absent_ids() {
    let layout = layout_with_group();

    assert_eq!(
        remove_component(&layout, "group1"),
        remove_container(&layout, "group1")
    );
    assert_eq!(remove_component(&layout, "ghost"), layout);
    assert_eq!(remove_container(&layout, BASE_CONTAINER_ID), layout);
}

#[test]
fn test_remove_components_by_type() {
    let layout = layout_with_group();
    let updated = remove_components_by_type(&layout, &ComponentType::Input);

    assert!(updated.children("group1").is_empty());
    assert_eq!(count_of_type(&updated, &ComponentType::Input), 0);
    assert_eq!(updated.len(), 3);
}

#[test]
fn test_update_component_id_rewrites_references() {
    let layout = layout_with_group();
    let updated = update_component_id(&layout, "Input-1", "name").unwrap();

    assert_eq!(updated.children("group1"), ["name", "Input-2"]);
    assert_eq!(updated.components["name"].id, "name");
    assert!(!updated.components.contains_key("Input-1"));
}

#[test]
fn test_update_ids_reject_collisions_and_unknown_items() {
    let layout = layout_with_group();

    assert_eq!(
        update_component_id(&layout, "Input-1", "Input-2"),
        Err(LayoutError::IdAlreadyInUse("Input-2".to_string()))
    );
    assert_eq!(
        update_component_id(&layout, "ghost", "x"),
        Err(LayoutError::ItemNotFound("ghost".to_string()))
    );
    assert_eq!(
        update_container_id(&layout, BASE_CONTAINER_ID, "root"),
        Err(LayoutError::BaseContainerImmutable("renamed"))
    );
}

#[test]
fn test_update_container_id_moves_its_child_list() {
    let layout = layout_with_group();
    let updated = update_container_id(&layout, "group1", "person").unwrap();

    assert_eq!(updated.children("person"), ["Input-1", "Input-2"]);
    assert!(!updated.order.contains_key("group1"));
    assert_eq!(
        updated.children(BASE_CONTAINER_ID),
        ["Header-1", "person", "NavigationButtons-1"]
    );

    // The file still comes out in its original sequence.
    let ids: Vec<String> = internal_to_external(&updated)
        .data
        .layout
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(
        ids,
        ["Header-1", "person", "Input-1", "Input-2", "NavigationButtons-1"]
    );
}

#[test]
fn test_update_component_replaces_record() {
    let layout = layout_with_group();
    let mut component = layout.components["Input-2"].clone();
    component.properties.insert("readOnly".to_string(), json!(true));
    component.id = "Input-3".to_string();

    let updated = update_component(&layout, "Input-2", component).unwrap();
    assert_eq!(updated.components["Input-3"].properties["readOnly"], json!(true));
    assert_eq!(updated.children("group1"), ["Input-1", "Input-3"]);
}

#[test]
fn test_update_container_replaces_record() {
    let layout = layout_with_group();
    let mut container = layout.containers["group1"].clone();
    container.table_headers = Some(vec!["Input-1".to_string()]);

    let updated = update_container(&layout, "group1", container).unwrap();
    assert_eq!(
        updated.containers["group1"].table_headers,
        Some(vec!["Input-1".to_string()])
    );
}

#[test]
fn test_move_item_between_containers() {
    let layout = layout_with_group();
    let updated = move_layout_item(&layout, "Header-1", "group1", 1).unwrap();

    assert_eq!(updated.children("group1"), ["Input-1", "Header-1", "Input-2"]);
    assert_eq!(find_parent_id(&updated, "Header-1"), Some("group1"));
    assert!(check_integrity(&updated).is_empty());
}

#[test]
fn test_move_container_into_itself_or_descendant_fails() {
    let layout = layout_with_group();
    let layout = add_item_of_type(&layout, &ComponentType::Group, "inner", Some("group1"), None);

    assert_eq!(
        move_layout_item(&layout, "group1", "group1", 0),
        Err(LayoutError::CyclicMove {
            item_id: "group1".to_string(),
            target_id: "group1".to_string()
        })
    );
    assert!(matches!(
        move_layout_item(&layout, "group1", "inner", 0),
        Err(LayoutError::CyclicMove { .. })
    ));
    assert_eq!(
        move_layout_item(&layout, "Input-1", "ghost", 0),
        Err(LayoutError::ContainerNotFound("ghost".to_string()))
    );
}

#[test]
fn test_check_add_rejects_invalid_children() {
    let config = EditorConfig::default();
    let layout = layout_with_group();

    assert!(check_add(&layout, "group1", &ComponentType::Input, &config).is_ok());
    assert_eq!(
        check_add(&layout, "group1", &ComponentType::NavigationButtons, &config),
        Err(ValidationError::InvalidChild {
            parent_id: "group1".to_string(),
            child_type: "NavigationButtons".to_string()
        })
    );
    assert!(check_add(&layout, BASE_CONTAINER_ID, &ComponentType::NavigationButtons, &config).is_ok());
    assert_eq!(
        check_add(&layout, "ghost", &ComponentType::Input, &config),
        Err(ValidationError::Layout(LayoutError::ContainerNotFound(
            "ghost".to_string()
        )))
    );
}

#[test]
fn test_check_add_limits_nesting_depth() {
    let config = EditorConfig::default();
    let layout = layout_with_group();
    assert!(check_add(&layout, "group1", &ComponentType::Group, &config).is_ok());

    let layout = add_item_of_type(&layout, &ComponentType::Group, "inner", Some("group1"), None);
    assert_eq!(get_depth(&layout), 1);
    assert_eq!(
        check_add(&layout, "inner", &ComponentType::Group, &config),
        Err(ValidationError::DepthExceeded { depth: 2, max: 1 })
    );
    // Leaf components may still go into the inner group.
    assert!(check_add(&layout, "inner", &ComponentType::Input, &config).is_ok());

    let deeper = EditorConfig::builder("ttd", "app")
        .with_max_container_depth(2)
        .build();
    assert!(check_add(&layout, "inner", &ComponentType::Group, &deeper).is_ok());
}

#[test]
fn test_check_move_validates_result() {
    let config = EditorConfig::default();
    let layout = layout_with_group();
    let layout = add_item_of_type(&layout, &ComponentType::Group, "other", None, None);
    let layout = add_item_of_type(&layout, &ComponentType::Group, "nested", Some("other"), None);

    assert!(check_move(&layout, "Header-1", "group1", &config).is_ok());
    assert!(matches!(
        check_move(&layout, "other", "group1", &config),
        Err(ValidationError::DepthExceeded { depth: 2, .. })
    ));
    assert!(matches!(
        check_move(&layout, "NavigationButtons-1", "group1", &config),
        Err(ValidationError::InvalidChild { .. })
    ));
    assert!(matches!(
        check_move(&layout, "other", "nested", &config),
        Err(ValidationError::Layout(LayoutError::CyclicMove { .. }))
    ));
}

#[test]
fn test_component_id_validation() {
    let layouts = pages(vec![
        ("page1", layout_with_group()),
        ("page2", layout_with("Summary-1", ComponentType::Summary)),
    ]);

    assert_eq!(validate_component_id("", None, &layouts), Err(ValidationError::EmptyId));
    assert_eq!(
        validate_component_id("has space", None, &layouts),
        Err(ValidationError::InvalidIdCharacters("has space".to_string()))
    );
    assert_eq!(
        validate_component_id("summary-1", None, &layouts),
        Err(ValidationError::DuplicateId(
            "summary-1".to_string(),
            "page2".to_string()
        ))
    );
    assert!(validate_component_id("new-id", None, &layouts).is_ok());
    // Changing only the case of an item's own id is allowed.
    assert!(validate_component_id("INPUT-1", Some("Input-1"), &layouts).is_ok());
}

#[test]
fn test_table_headers_validation() {
    let mut container = FormContainer::new("rep", ComponentType::RepeatingGroup);
    assert!(validate_table_headers(&container).is_ok());

    container.table_headers = Some(Vec::new());
    assert_eq!(
        validate_table_headers(&container),
        Err(ValidationError::EmptyTableHeaders("rep".to_string()))
    );
}
