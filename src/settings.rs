//! `Settings.json` of a layout set and the page operations that go with it.

use crate::component::JsonObject;
use crate::error::SettingsError;
use crate::layout::{FormLayouts, InternalLayout};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSettings {
    #[serde(default)]
    pub order: Vec<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Page order and receipt configuration of a layout set.
///
/// Unknown keys are kept in `extra` and written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSettings {
    #[serde(default)]
    pub pages: PageSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_layout_name: Option<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl LayoutSettings {
    pub fn with_pages<S: AsRef<str>>(pages: &[S]) -> Self {
        Self {
            pages: PageSettings {
                order: pages.iter().map(|p| p.as_ref().to_string()).collect(),
                ..PageSettings::default()
            },
            ..Self::default()
        }
    }

    pub fn order(&self) -> &[String] {
        &self.pages.order
    }

    pub fn has_page(&self, name: &str) -> bool {
        self.pages.order.iter().any(|p| p == name)
    }

    fn position(&self, name: &str) -> Result<usize, SettingsError> {
        self.pages
            .order
            .iter()
            .position(|p| p == name)
            .ok_or_else(|| SettingsError::PageNotFound(name.to_string()))
    }

    /// Appends a page to the order.
    pub fn add_page(&mut self, name: &str) -> Result<(), SettingsError> {
        if self.has_page(name) {
            return Err(SettingsError::PageExists(name.to_string()));
        }
        self.pages.order.push(name.to_string());
        Ok(())
    }

    /// Removes a page from the order. Clears the receipt if it pointed at the page.
    pub fn delete_page(&mut self, name: &str) -> Result<(), SettingsError> {
        let index = self.position(name)?;
        self.pages.order.remove(index);
        if self.receipt_layout_name.as_deref() == Some(name) {
            self.receipt_layout_name = None;
        }
        Ok(())
    }

    pub fn rename_page(&mut self, old_name: &str, new_name: &str) -> Result<(), SettingsError> {
        let index = self.position(old_name)?;
        if old_name == new_name {
            return Ok(());
        }
        if self.has_page(new_name) {
            return Err(SettingsError::PageExists(new_name.to_string()));
        }
        self.pages.order[index] = new_name.to_string();
        if self.receipt_layout_name.as_deref() == Some(old_name) {
            self.receipt_layout_name = Some(new_name.to_string());
        }
        Ok(())
    }

    /// Moves a page to `index`, clamped to the end of the order.
    pub fn move_page(&mut self, name: &str, index: usize) -> Result<(), SettingsError> {
        let current = self.position(name)?;
        let page = self.pages.order.remove(current);
        let index = index.min(self.pages.order.len());
        self.pages.order.insert(index, page);
        Ok(())
    }

    /// Sets or clears the receipt page. The receipt does not have to be in the order.
    pub fn set_receipt_layout(&mut self, name: Option<&str>) {
        self.receipt_layout_name = name.map(str::to_string);
    }
}

/// Adds an empty page to a layout set.
pub fn add_page(layouts: &FormLayouts, name: &str) -> Result<FormLayouts, SettingsError> {
    if layouts.contains_key(name) {
        return Err(SettingsError::PageExists(name.to_string()));
    }
    let mut updated = layouts.clone();
    updated.insert(name.to_string(), InternalLayout::empty());
    debug!(page = %name, "Added page");
    Ok(updated)
}

pub fn delete_page(layouts: &FormLayouts, name: &str) -> Result<FormLayouts, SettingsError> {
    let mut updated = layouts.clone();
    if updated.remove(name).is_none() {
        return Err(SettingsError::PageNotFound(name.to_string()));
    }
    debug!(page = %name, "Deleted page");
    Ok(updated)
}

pub fn rename_page(
    layouts: &FormLayouts,
    old_name: &str,
    new_name: &str,
) -> Result<FormLayouts, SettingsError> {
    if old_name != new_name && layouts.contains_key(new_name) {
        return Err(SettingsError::PageExists(new_name.to_string()));
    }
    let mut updated = layouts.clone();
    let layout = updated
        .remove(old_name)
        .ok_or_else(|| SettingsError::PageNotFound(old_name.to_string()))?;
    updated.insert(new_name.to_string(), layout);
    debug!(old = %old_name, new = %new_name, "Renamed page");
    Ok(updated)
}
