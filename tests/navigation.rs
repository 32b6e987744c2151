//! Tests for the navigation-button reconciler.
mod common;
use common::*;
use std::cell::RefCell;
use studio_layout::layout::has_navigation_buttons;
use studio_layout::navigation::generate_component_id_with_length;
use studio_layout::prelude::*;

fn collect_saves(saved: &RefCell<Vec<String>>) -> impl FnMut(&str, &InternalLayout) -> Result<(), String> + '_ {
    move |page, _| {
        saved.borrow_mut().push(page.to_string());
        Ok(())
    }
}

#[test]
fn test_two_pages_both_get_navigation_buttons() {
    let layouts = pages(vec![
        ("page1", InternalLayout::empty()),
        ("page2", InternalLayout::empty()),
    ]);
    let saved = RefCell::new(Vec::new());

    let outcome =
        add_or_remove_navigation_buttons(&layouts, collect_saves(&saved), Some("page1"), None)
            .unwrap();

    let nav = ComponentType::NavigationButtons;
    assert_eq!(count_of_type(&outcome.layouts["page1"], &nav), 1);
    assert_eq!(count_of_type(&outcome.layouts["page2"], &nav), 1);
    // The other pages are saved first, the current page last.
    assert_eq!(*saved.borrow(), ["page2", "page1"]);
    assert_eq!(outcome.persisted, ["page2", "page1"]);
    assert!(outcome.is_complete());

    let id1 = &outcome.layouts["page1"].children(BASE_CONTAINER_ID)[0];
    let id2 = &outcome.layouts["page2"].children(BASE_CONTAINER_ID)[0];
    assert_ne!(id1, id2);
    assert!(id1.starts_with("NavigationButtons-"));
}

#[test]
fn test_pages_with_buttons_are_not_saved_again() {
    let layouts = pages(vec![
        ("page1", layout_with("nav-1", ComponentType::NavigationButtons)),
        ("page2", layout_with("nav-2", ComponentType::NavigationButtons)),
        ("page3", InternalLayout::empty()),
    ]);
    let saved = RefCell::new(Vec::new());

    let outcome =
        add_or_remove_navigation_buttons(&layouts, collect_saves(&saved), Some("page1"), None)
            .unwrap();

    assert_eq!(*saved.borrow(), ["page3"]);
    assert_eq!(outcome.layouts["page1"], layouts["page1"]);
    assert!(has_navigation_buttons(&outcome.layouts["page3"]));
}

#[test]
fn test_single_page_loses_its_buttons() {
    let mut layout = layout_with_group();
    layout = add_navigation_buttons(&layout, "extra-nav");
    let layouts = pages(vec![("only", layout)]);
    let saved = RefCell::new(Vec::new());

    let outcome =
        add_or_remove_navigation_buttons(&layouts, collect_saves(&saved), None, None).unwrap();

    assert!(!has_navigation_buttons(&outcome.layouts["only"]));
    assert!(outcome.layouts["only"].contains("Input-1"));
    assert_eq!(*saved.borrow(), ["only"]);
}

#[test]
fn test_single_page_without_buttons_is_left_alone() {
    let layouts = pages(vec![("only", layout_with("Input-1", ComponentType::Input))]);
    let saved = RefCell::new(Vec::new());

    let outcome =
        add_or_remove_navigation_buttons(&layouts, collect_saves(&saved), Some("only"), None)
            .unwrap();

    assert!(saved.borrow().is_empty());
    assert_eq!(outcome.layouts, layouts);
}

#[test]
fn test_receipt_page_is_never_touched() {
    let layouts = pages(vec![
        ("form", layout_with("nav", ComponentType::NavigationButtons)),
        ("receipt", InternalLayout::empty()),
    ]);
    let saved = RefCell::new(Vec::new());

    let outcome = add_or_remove_navigation_buttons(
        &layouts,
        collect_saves(&saved),
        None,
        Some("receipt"),
    )
    .unwrap();

    // Only one content page: its buttons go, the receipt stays empty.
    assert!(!has_navigation_buttons(&outcome.layouts["form"]));
    assert!(outcome.layouts["receipt"].is_empty());
    assert_eq!(*saved.borrow(), ["form"]);
}

#[test]
fn test_unknown_current_page_fails() {
    let layouts = pages(vec![("page1", InternalLayout::empty())]);

    let result = add_or_remove_navigation_buttons(
        &layouts,
        |_: &str, _: &InternalLayout| Ok::<(), String>(()),
        Some("ghost"),
        None,
    );
    assert_eq!(
        result.err(),
        Some(NavigationError::PageNotFound("ghost".to_string()))
    );
}

#[test]
fn test_failed_saves_are_collected() {
    let layouts = pages(vec![
        ("page1", InternalLayout::empty()),
        ("page2", InternalLayout::empty()),
        ("page3", InternalLayout::empty()),
    ]);

    let outcome = add_or_remove_navigation_buttons(
        &layouts,
        |page: &str, _: &InternalLayout| {
            if page == "page2" {
                Err("network down".to_string())
            } else {
                Ok(())
            }
        },
        None,
        None,
    )
    .unwrap();

    assert!(!outcome.is_complete());
    assert_eq!(outcome.failed_pages(), ["page2"]);
    assert_eq!(outcome.persisted, ["page1", "page3"]);
    assert_eq!(outcome.failed[0].1, "network down");
}

#[test]
fn test_generated_ids_are_unique_across_pages() {
    let layouts = pages(vec![("page1", layout_with_group())]);

    let id = generate_component_id(&ComponentType::Input, &layouts);
    let (prefix, suffix) = id.split_once('-').unwrap();
    assert_eq!(prefix, "Input");
    assert_eq!(suffix.len(), 6);
    assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));

    let long = generate_component_id_with_length(&ComponentType::Header, &layouts, 10);
    assert_eq!(long.len(), "Header-".len() + 10);
}

#[test]
fn test_generated_ids_grow_when_short_suffixes_are_taken() {
    let mut layout = InternalLayout::empty();
    for c in ('0'..='9').chain('a'..='z').chain('A'..='Z') {
        layout = add_item_of_type(&layout, &ComponentType::Input, &format!("Input-{c}"), None, None);
    }
    let layouts = pages(vec![("page1", layout)]);

    // A zero length is treated as one, and every one-character suffix is taken.
    let id = generate_component_id_with_length(&ComponentType::Input, &layouts, 0);
    let suffix = id.strip_prefix("Input-").unwrap();
    assert!(suffix.len() >= 2);
    assert!(!layouts["page1"].contains(&id));
}

#[test]
fn test_unconverted_pages_count_as_content_pages() {
    let unconverted = vec!["page2".to_string()];
    let saved = RefCell::new(Vec::new());

    // With an unconverted second page the form is still multi-page.
    let with_nav = pages(vec![("page1", layout_with("nav", ComponentType::NavigationButtons))]);
    let outcome =
        reconcile_navigation_buttons(&with_nav, &unconverted, collect_saves(&saved), None, None)
            .unwrap();
    assert!(has_navigation_buttons(&outcome.layouts["page1"]));
    assert!(saved.borrow().is_empty());

    let without_nav = pages(vec![("page1", layout_with("Input-1", ComponentType::Input))]);
    let outcome =
        reconcile_navigation_buttons(&without_nav, &unconverted, collect_saves(&saved), None, None)
            .unwrap();
    assert!(has_navigation_buttons(&outcome.layouts["page1"]));
    assert_eq!(*saved.borrow(), ["page1"]);

    // An unconverted receipt does not count.
    let outcome = reconcile_navigation_buttons(
        &with_nav,
        &unconverted,
        |_: &str, _: &InternalLayout| Ok::<(), String>(()),
        None,
        Some("page2"),
    )
    .unwrap();
    assert!(!has_navigation_buttons(&outcome.layouts["page1"]));
}
