//! Conversion between the backend's flat layout files and the internal tree model.
//!
//! Loading a layout set goes through [`convert_external_layouts`] or
//! [`convert_loaded_layouts`], which never fail as a whole: pages that cannot be
//! converted (malformed JSON, duplicate ids, unreachable items) are collected in
//! [`ConvertedLayouts::invalid_layouts`] so the editor can flag them while the rest of
//! the pages stay editable.

use crate::error::ConversionError;
use crate::layout::{FormLayouts, InternalLayout};
use itertools::Itertools;
use tracing::{debug, warn};

pub mod external;
mod to_external;
mod to_internal;

pub use external::*;
pub use to_external::internal_to_external;
pub use to_internal::external_to_internal;

/// A page that could not be converted, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLayout {
    pub page: String,
    pub reason: ConversionError,
}

/// The result of converting a whole layout set.
#[derive(Debug, Clone, Default)]
pub struct ConvertedLayouts {
    pub layouts: FormLayouts,
    /// Sorted by page name.
    pub invalid_layouts: Vec<InvalidLayout>,
}

impl ConvertedLayouts {
    pub fn invalid_page_names(&self) -> Vec<&str> {
        self.invalid_layouts.iter().map(|l| l.page.as_str()).collect()
    }
}

impl ConvertedLayouts {
    fn insert(&mut self, page: &str, result: Result<InternalLayout, ConversionError>) {
        match result {
            Ok(layout) => {
                debug!(page = %page, items = layout.len(), "Converted layout");
                self.layouts.insert(page.to_string(), layout);
            }
            Err(reason) => {
                warn!(page = %page, "Layout is invalid: {}", reason);
                self.invalid_layouts.push(InvalidLayout {
                    page: page.to_string(),
                    reason,
                });
            }
        }
    }
}

/// Converts every page of a layout set, separating out the pages that fail.
pub fn convert_external_layouts(pages: &ExternalLayouts) -> ConvertedLayouts {
    let mut converted = ConvertedLayouts::default();
    for (page, external) in pages.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
        converted.insert(page, external_to_internal(Some(external)));
    }
    converted
}

/// Like [`convert_external_layouts`], for pages whose files may not have parsed.
/// Those pages end up in `invalid_layouts` with their parse error.
pub fn convert_loaded_layouts(pages: &LoadedLayouts) -> ConvertedLayouts {
    let mut converted = ConvertedLayouts::default();
    for (page, loaded) in pages.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
        let result = match loaded {
            Ok(external) => external_to_internal(Some(external)),
            Err(reason) => Err(reason.clone()),
        };
        converted.insert(page, result);
    }
    converted
}

/// Converts every page of a collection back into layout files.
pub fn convert_internal_layouts(layouts: &FormLayouts) -> ExternalLayouts {
    layouts
        .iter()
        .map(|(page, layout): (&String, &InternalLayout)| (page.clone(), internal_to_external(layout)))
        .collect()
}
