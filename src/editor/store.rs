use crate::convert::{ExternalFormLayout, ExternalLayouts, LoadedLayouts};
use crate::error::BackendError;
use crate::rules::RuleConfig;
use crate::settings::LayoutSettings;
use ahash::AHashMap;

/// Where layout sets are read from and written to.
///
/// The web editor talks to a REST API here; the crate ships an in-memory store and a
/// store over an app checkout on disk.
pub trait LayoutStore {
    fn get_form_layouts(&self, layout_set: &str) -> Result<ExternalLayouts, BackendError>;

    /// Reads every page of a layout set. A page that cannot be parsed fails on its own
    /// instead of failing the whole set.
    fn load_form_layouts(&self, layout_set: &str) -> Result<LoadedLayouts, BackendError> {
        Ok(self
            .get_form_layouts(layout_set)?
            .into_iter()
            .map(|(page, layout)| (page, Ok(layout)))
            .collect())
    }

    fn save_form_layout(
        &mut self,
        layout_set: &str,
        page: &str,
        layout: &ExternalFormLayout,
    ) -> Result<(), BackendError>;

    fn delete_form_layout(&mut self, layout_set: &str, page: &str) -> Result<(), BackendError>;

    fn get_layout_settings(&self, layout_set: &str) -> Result<LayoutSettings, BackendError>;

    fn save_layout_settings(
        &mut self,
        layout_set: &str,
        settings: &LayoutSettings,
    ) -> Result<(), BackendError>;

    fn get_rule_config(&self, layout_set: &str) -> Result<RuleConfig, BackendError>;

    fn save_rule_config(&mut self, layout_set: &str, config: &RuleConfig)
    -> Result<(), BackendError>;
}

/// Everything stored for one layout set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutSetFiles {
    pub pages: ExternalLayouts,
    pub settings: LayoutSettings,
    pub rule_config: RuleConfig,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    sets: AHashMap<String, LayoutSetFiles>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout_set(mut self, layout_set: &str, files: LayoutSetFiles) -> Self {
        self.sets.insert(layout_set.to_string(), files);
        self
    }

    pub fn layout_set(&self, layout_set: &str) -> Option<&LayoutSetFiles> {
        self.sets.get(layout_set)
    }

    fn files(&self, layout_set: &str) -> Result<&LayoutSetFiles, BackendError> {
        self.sets
            .get(layout_set)
            .ok_or_else(|| BackendError::NotFound(format!("layout set '{layout_set}'")))
    }

    fn files_mut(&mut self, layout_set: &str) -> Result<&mut LayoutSetFiles, BackendError> {
        self.sets
            .get_mut(layout_set)
            .ok_or_else(|| BackendError::NotFound(format!("layout set '{layout_set}'")))
    }
}

impl LayoutStore for MemoryStore {
    fn get_form_layouts(&self, layout_set: &str) -> Result<ExternalLayouts, BackendError> {
        Ok(self.files(layout_set)?.pages.clone())
    }

    fn save_form_layout(
        &mut self,
        layout_set: &str,
        page: &str,
        layout: &ExternalFormLayout,
    ) -> Result<(), BackendError> {
        self.files_mut(layout_set)?
            .pages
            .insert(page.to_string(), layout.clone());
        Ok(())
    }

    fn delete_form_layout(&mut self, layout_set: &str, page: &str) -> Result<(), BackendError> {
        self.files_mut(layout_set)?
            .pages
            .remove(page)
            .map(|_| ())
            .ok_or_else(|| BackendError::NotFound(format!("page '{page}'")))
    }

    fn get_layout_settings(&self, layout_set: &str) -> Result<LayoutSettings, BackendError> {
        Ok(self.files(layout_set)?.settings.clone())
    }

    fn save_layout_settings(
        &mut self,
        layout_set: &str,
        settings: &LayoutSettings,
    ) -> Result<(), BackendError> {
        self.files_mut(layout_set)?.settings = settings.clone();
        Ok(())
    }

    fn get_rule_config(&self, layout_set: &str) -> Result<RuleConfig, BackendError> {
        Ok(self.files(layout_set)?.rule_config.clone())
    }

    fn save_rule_config(
        &mut self,
        layout_set: &str,
        config: &RuleConfig,
    ) -> Result<(), BackendError> {
        self.files_mut(layout_set)?.rule_config = config.clone();
        Ok(())
    }
}
