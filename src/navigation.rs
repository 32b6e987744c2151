//! Keeps navigation buttons in line with the number of pages in a layout set.
//!
//! A form with a single content page needs no navigation, while every page of a
//! multi-page form needs a way forward and back. The receipt page is managed separately
//! and is never touched.

use crate::component::ComponentType;
use crate::error::NavigationError;
use crate::layout::{FormLayouts, InternalLayout, has_navigation_buttons, id_exists};
use crate::mutate::{add_navigation_buttons, remove_components_by_type};
use itertools::Itertools;
use rand::Rng;
use rand::distr::Alphanumeric;
use std::fmt::Display;
use tracing::{debug, error, info};

/// Suffix length of generated ids, `NavigationButtons-a1b2c3`.
pub const DEFAULT_ID_SUFFIX_LENGTH: usize = 6;

const ATTEMPTS_PER_LENGTH: usize = 32;

/// Result of a reconciliation pass.
#[derive(Debug, Clone)]
pub struct NavigationOutcome<E> {
    /// All pages, with the reconciled ones replaced.
    pub layouts: FormLayouts,
    /// Pages that changed and were persisted.
    pub persisted: Vec<String>,
    /// Pages that changed but could not be persisted.
    pub failed: Vec<(String, E)>,
}

impl<E> NavigationOutcome<E> {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_pages(&self) -> Vec<&str> {
        self.failed.iter().map(|(page, _)| page.as_str()).collect()
    }
}

/// Generates `<Type>-<suffix>` ids until one is free on every page.
pub fn generate_component_id(component_type: &ComponentType, layouts: &FormLayouts) -> String {
    generate_component_id_with_length(component_type, layouts, DEFAULT_ID_SUFFIX_LENGTH)
}

/// Like [`generate_component_id`] with a given suffix length, at least 1. After
/// repeated collisions the suffix grows by one character.
pub fn generate_component_id_with_length(
    component_type: &ComponentType,
    layouts: &FormLayouts,
    length: usize,
) -> String {
    let mut length = length.max(1);
    loop {
        for _ in 0..ATTEMPTS_PER_LENGTH {
            let suffix: String = rand::rng()
                .sample_iter(Alphanumeric)
                .take(length)
                .map(char::from)
                .collect();
            let id = format!("{component_type}-{suffix}");
            if !layouts.values().any(|layout| id_exists(&id, layout)) {
                return id;
            }
        }
        debug!(length, "Generated ids keep colliding, growing the suffix");
        length += 1;
    }
}

fn with_navigation_buttons(layouts: &FormLayouts, page: &str) -> Option<InternalLayout> {
    let layout = layouts.get(page)?;
    if has_navigation_buttons(layout) {
        return None;
    }
    let id = generate_component_id(&ComponentType::NavigationButtons, layouts);
    Some(add_navigation_buttons(layout, &id))
}

/// Adds or removes navigation buttons so that they are present on every content page
/// of a multi-page form and absent from a single-page form.
///
/// Every page that changes is handed to `persist`. A failing page does not stop the
/// others from being attempted; failures are collected in the outcome.
pub fn add_or_remove_navigation_buttons<E, F>(
    layouts: &FormLayouts,
    persist: F,
    current_page: Option<&str>,
    receipt_page: Option<&str>,
) -> Result<NavigationOutcome<E>, NavigationError>
where
    E: Display,
    F: FnMut(&str, &InternalLayout) -> Result<(), E>,
{
    reconcile_navigation_buttons(layouts, &[], persist, current_page, receipt_page)
}

/// [`add_or_remove_navigation_buttons`] for a layout set that also holds pages which
/// could not be converted. Those pages are left alone, but they still count as content
/// pages, so buttons are never stripped while any of them exist.
pub fn reconcile_navigation_buttons<E, F>(
    layouts: &FormLayouts,
    unconverted_pages: &[String],
    mut persist: F,
    current_page: Option<&str>,
    receipt_page: Option<&str>,
) -> Result<NavigationOutcome<E>, NavigationError>
where
    E: Display,
    F: FnMut(&str, &InternalLayout) -> Result<(), E>,
{
    if let Some(page) = current_page {
        if !layouts.contains_key(page) {
            return Err(NavigationError::PageNotFound(page.to_string()));
        }
    }

    let current_page = current_page.filter(|page| Some(*page) != receipt_page);
    let content_pages: Vec<String> = layouts
        .keys()
        .filter(|page| Some(page.as_str()) != receipt_page)
        .sorted()
        .cloned()
        .collect();
    let unconverted = unconverted_pages
        .iter()
        .filter(|page| Some(page.as_str()) != receipt_page && !layouts.contains_key(*page))
        .count();
    let page_count = content_pages.len() + unconverted;

    let mut updated = layouts.clone();
    let mut changed = Vec::new();

    if let ([only_page], 1) = (content_pages.as_slice(), page_count) {
        if let Some(layout) = layouts.get(only_page).filter(|l| has_navigation_buttons(l)) {
            let stripped = remove_components_by_type(layout, &ComponentType::NavigationButtons);
            updated.insert(only_page.clone(), stripped);
            changed.push(only_page.clone());
        }
    } else if page_count > 1 {
        let pages = content_pages
            .iter()
            .map(String::as_str)
            .filter(|page| Some(*page) != current_page)
            .chain(current_page);
        for page in pages {
            if let Some(layout) = with_navigation_buttons(&updated, page) {
                updated.insert(page.to_string(), layout);
                changed.push(page.to_string());
            }
        }
    }
    debug!(pages = page_count, changed = changed.len(), "Reconciled navigation buttons");

    let mut persisted = Vec::new();
    let mut failed = Vec::new();
    for page in changed {
        let Some(layout) = updated.get(&page) else {
            continue;
        };
        match persist(&page, layout) {
            Ok(()) => {
                info!(page = %page, "Persisted navigation change");
                persisted.push(page);
            }
            Err(err) => {
                error!(page = %page, error = %err, "Failed to persist navigation change");
                failed.push((page, err));
            }
        }
    }

    Ok(NavigationOutcome {
        layouts: updated,
        persisted,
        failed,
    })
}
