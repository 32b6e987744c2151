use super::store::LayoutStore;
use crate::cache::{CachedValue, QueryCache, QueryKey, QueryResource};
use crate::component::ComponentType;
use crate::config::EditorConfig;
use crate::convert::{ExternalFormLayout, InvalidLayout, convert_loaded_layouts, internal_to_external};
use crate::debounce::DebouncedSave;
use crate::error::{EditorError, LayoutError, SettingsError};
use crate::layout::{BASE_CONTAINER_ID, FormLayouts, InternalLayout, all_item_ids, is_container};
use crate::mutate::{
    add_item_of_type, move_layout_item, remove_component, update_component_id, update_container_id,
};
use crate::navigation::{
    NavigationOutcome, generate_component_id_with_length, reconcile_navigation_buttons,
};
use crate::process::TaskHandlingReport;
use crate::rules::{RuleConfig, remove_field_references, switch_selected_field_id};
use crate::settings::{self, LayoutSettings};
use crate::validate::{check_add, check_move, validate_component_id};
use ahash::AHashMap;
use std::time::Instant;
use tracing::{debug, info, warn};

/// (layout set, page)
type PageKey = (String, String);

/// Editing session over the layout sets of one app.
///
/// Reads go through a query cache; every successful write invalidates the entries it
/// affects. Multi-step operations persist step by step, so a failure leaves the steps
/// before it committed.
pub struct LayoutEditor<S: LayoutStore> {
    config: EditorConfig,
    store: S,
    cache: QueryCache,
    invalid_layouts: AHashMap<String, Vec<InvalidLayout>>,
    pending_save: DebouncedSave<PageKey, InternalLayout>,
}

impl<S: LayoutStore> LayoutEditor<S> {
    pub fn new(config: EditorConfig, store: S) -> Self {
        let pending_save = DebouncedSave::new(config.save_debounce());
        Self {
            config,
            store,
            cache: QueryCache::new(),
            invalid_layouts: AHashMap::new(),
            pending_save,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn key(&self, resource: QueryResource, layout_set: &str) -> QueryKey {
        QueryKey::new(resource, &self.config.org, &self.config.app, Some(layout_set))
    }

    fn to_external(&self, layout: &InternalLayout) -> ExternalFormLayout {
        internal_to_external(layout).with_default_schema(&self.config.layout_schema_url)
    }

    /// All valid pages of a layout set. Pages that fail to convert are left out and
    /// reported by [`LayoutEditor::invalid_layouts`].
    pub fn layouts(&mut self, layout_set: &str) -> Result<FormLayouts, EditorError> {
        let key = self.key(QueryResource::FormLayouts, layout_set);
        if let Some(layouts) = self.cache.get(&key).and_then(CachedValue::as_form_layouts) {
            return Ok(layouts.clone());
        }
        let loaded = self.store.load_form_layouts(layout_set)?;
        let converted = convert_loaded_layouts(&loaded);
        if !converted.invalid_layouts.is_empty() {
            warn!(
                layout_set = %layout_set,
                pages = ?converted.invalid_page_names(),
                "Layout set contains invalid pages"
            );
        }
        self.invalid_layouts
            .insert(layout_set.to_string(), converted.invalid_layouts);
        self.cache
            .set(key, CachedValue::FormLayouts(converted.layouts.clone()));
        Ok(converted.layouts)
    }

    /// Pages of the layout set that could not be converted at the last fetch.
    pub fn invalid_layouts(&self, layout_set: &str) -> &[InvalidLayout] {
        self.invalid_layouts
            .get(layout_set)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn invalid_page_names(&self, layout_set: &str) -> Vec<String> {
        self.invalid_layouts(layout_set)
            .iter()
            .map(|l| l.page.clone())
            .collect()
    }

    pub fn layout(&mut self, layout_set: &str, page: &str) -> Result<InternalLayout, EditorError> {
        let mut layouts = self.layouts(layout_set)?;
        if let Some(layout) = layouts.remove(page) {
            return Ok(layout);
        }
        if let Some(invalid) = self
            .invalid_layouts(layout_set)
            .iter()
            .find(|l| l.page == page)
        {
            return Err(EditorError::InvalidPage {
                layout_set: layout_set.to_string(),
                page: page.to_string(),
                source: invalid.reason.clone(),
            });
        }
        Err(SettingsError::PageNotFound(page.to_string()).into())
    }

    pub fn layout_settings(&mut self, layout_set: &str) -> Result<LayoutSettings, EditorError> {
        let key = self.key(QueryResource::LayoutSettings, layout_set);
        if let Some(settings) = self.cache.get(&key).and_then(CachedValue::as_layout_settings) {
            return Ok(settings.clone());
        }
        let settings = self.store.get_layout_settings(layout_set)?;
        self.cache
            .set(key, CachedValue::LayoutSettings(settings.clone()));
        Ok(settings)
    }

    pub fn rule_config(&mut self, layout_set: &str) -> Result<RuleConfig, EditorError> {
        let key = self.key(QueryResource::RuleConfig, layout_set);
        if let Some(config) = self.cache.get(&key).and_then(CachedValue::as_rule_config) {
            return Ok(config.clone());
        }
        let config = self.store.get_rule_config(layout_set)?;
        self.cache.set(key, CachedValue::RuleConfig(config.clone()));
        Ok(config)
    }

    fn invalidate(&mut self, resource: QueryResource, layout_set: &str) {
        let key = self.key(resource, layout_set);
        self.cache.invalidate(&key);
    }

    /// Persists one page and drops the cached layouts of its set.
    pub fn save_layout(
        &mut self,
        layout_set: &str,
        page: &str,
        layout: &InternalLayout,
    ) -> Result<(), EditorError> {
        let external = self.to_external(layout);
        self.store.save_form_layout(layout_set, page, &external)?;
        self.invalidate(QueryResource::FormLayouts, layout_set);
        info!(layout_set = %layout_set, page = %page, "Saved layout");
        Ok(())
    }

    fn save_settings(&mut self, layout_set: &str, settings: &LayoutSettings) -> Result<(), EditorError> {
        self.store.save_layout_settings(layout_set, settings)?;
        self.invalidate(QueryResource::LayoutSettings, layout_set);
        Ok(())
    }

    fn save_rule_config(&mut self, layout_set: &str, config: &RuleConfig) -> Result<(), EditorError> {
        self.store.save_rule_config(layout_set, config)?;
        self.invalidate(QueryResource::RuleConfig, layout_set);
        Ok(())
    }

    /// Adds a new item of `component_type` and returns its id.
    ///
    /// Without an explicit `id` a unique one is generated from the type name.
    pub fn add_item(
        &mut self,
        layout_set: &str,
        page: &str,
        component_type: &ComponentType,
        id: Option<&str>,
        parent_id: Option<&str>,
        position: Option<usize>,
    ) -> Result<String, EditorError> {
        let layouts = self.layouts(layout_set)?;
        let layout = self.layout(layout_set, page)?;
        let parent_id = parent_id.unwrap_or(BASE_CONTAINER_ID);
        check_add(&layout, parent_id, component_type, &self.config)?;

        let id = match id {
            Some(id) => {
                validate_component_id(id, None, &layouts)?;
                id.to_string()
            }
            None => generate_component_id_with_length(
                component_type,
                &layouts,
                self.config.generated_id_length,
            ),
        };
        let updated = add_item_of_type(&layout, component_type, &id, Some(parent_id), position);
        self.save_layout(layout_set, page, &updated)?;
        Ok(id)
    }

    pub fn move_item(
        &mut self,
        layout_set: &str,
        page: &str,
        id: &str,
        new_parent_id: &str,
        new_index: usize,
    ) -> Result<(), EditorError> {
        let layout = self.layout(layout_set, page)?;
        check_move(&layout, id, new_parent_id, &self.config)?;
        let updated = move_layout_item(&layout, id, new_parent_id, new_index)?;
        self.save_layout(layout_set, page, &updated)
    }

    /// Removes an item (with its children), then drops rule references to anything removed.
    pub fn remove_item(&mut self, layout_set: &str, page: &str, id: &str) -> Result<(), EditorError> {
        let layout = self.layout(layout_set, page)?;
        if !layout.contains(id) {
            return Err(LayoutError::ItemNotFound(id.to_string()).into());
        }
        let updated = remove_component(&layout, id);
        self.save_layout(layout_set, page, &updated)?;

        let remaining = all_item_ids(&updated);
        let removed: Vec<String> = all_item_ids(&layout)
            .into_iter()
            .filter(|item| !remaining.contains(item))
            .collect();
        let mut rule_config = self.rule_config(layout_set)?;
        let dropped: usize = removed
            .iter()
            .map(|item| remove_field_references(&mut rule_config, item))
            .sum();
        if dropped > 0 {
            debug!(item = %id, references = dropped, "Dropping rule references to removed items");
            self.save_rule_config(layout_set, &rule_config)?;
        }
        Ok(())
    }

    /// Renames an item. Rule references follow once the layout has been saved.
    pub fn rename_item(
        &mut self,
        layout_set: &str,
        page: &str,
        old_id: &str,
        new_id: &str,
    ) -> Result<(), EditorError> {
        let layouts = self.layouts(layout_set)?;
        let layout = self.layout(layout_set, page)?;
        validate_component_id(new_id, Some(old_id), &layouts)?;
        let updated = if is_container(&layout, old_id) {
            update_container_id(&layout, old_id, new_id)?
        } else {
            update_component_id(&layout, old_id, new_id)?
        };
        self.save_layout(layout_set, page, &updated)?;

        let mut rule_config = self.rule_config(layout_set)?;
        if switch_selected_field_id(&mut rule_config, old_id, new_id) > 0 {
            self.save_rule_config(layout_set, &rule_config)?;
        }
        Ok(())
    }

    fn reconcile_navigation(
        &mut self,
        layout_set: &str,
        layouts: &FormLayouts,
        unconverted_pages: &[String],
        current_page: Option<&str>,
        receipt_page: Option<&str>,
    ) -> Result<(), EditorError> {
        let schema_url = self.config.layout_schema_url.clone();
        let store = &mut self.store;
        let outcome: NavigationOutcome<_> = reconcile_navigation_buttons(
            layouts,
            unconverted_pages,
            |page, layout| {
                let external = internal_to_external(layout).with_default_schema(&schema_url);
                store.save_form_layout(layout_set, page, &external)
            },
            current_page,
            receipt_page,
        )?;
        self.invalidate(QueryResource::FormLayouts, layout_set);
        if !outcome.is_complete() {
            let failed = outcome
                .failed_pages()
                .into_iter()
                .map(str::to_string)
                .collect();
            return Err(EditorError::PartialSave(failed));
        }
        Ok(())
    }

    /// Creates an empty page, appends it to the page order and updates navigation.
    pub fn add_page(&mut self, layout_set: &str, page: &str) -> Result<(), EditorError> {
        let layouts = self.layouts(layout_set)?;
        let unconverted = self.invalid_page_names(layout_set);
        if unconverted.iter().any(|p| p == page) {
            return Err(SettingsError::PageExists(page.to_string()).into());
        }
        let layouts = settings::add_page(&layouts, page)?;
        let mut layout_settings = self.layout_settings(layout_set)?;
        layout_settings.add_page(page)?;

        self.save_layout(layout_set, page, &InternalLayout::empty())?;
        self.save_settings(layout_set, &layout_settings)?;
        self.reconcile_navigation(
            layout_set,
            &layouts,
            &unconverted,
            Some(page),
            layout_settings.receipt_layout_name.as_deref(),
        )
    }

    /// Deletes a page, removes it from the settings and updates navigation.
    ///
    /// Pages that could not be converted can be deleted too.
    pub fn delete_page(&mut self, layout_set: &str, page: &str) -> Result<(), EditorError> {
        let layouts = self.layouts(layout_set)?;
        let mut unconverted = self.invalid_page_names(layout_set);
        let layouts = match unconverted.iter().position(|p| p == page) {
            Some(index) => {
                unconverted.remove(index);
                layouts
            }
            None => settings::delete_page(&layouts, page)?,
        };
        self.store.delete_form_layout(layout_set, page)?;
        self.invalidate(QueryResource::FormLayouts, layout_set);

        let mut layout_settings = self.layout_settings(layout_set)?;
        if layout_settings.has_page(page) {
            layout_settings.delete_page(page)?;
        }
        if layout_settings.receipt_layout_name.as_deref() == Some(page) {
            layout_settings.set_receipt_layout(None);
        }
        self.save_settings(layout_set, &layout_settings)?;
        self.reconcile_navigation(
            layout_set,
            &layouts,
            &unconverted,
            None,
            layout_settings.receipt_layout_name.as_deref(),
        )
    }

    /// Marks a page as the receipt, or clears the receipt with `None`.
    pub fn set_receipt_page(&mut self, layout_set: &str, page: Option<&str>) -> Result<(), EditorError> {
        if let Some(page) = page {
            if !self.layouts(layout_set)?.contains_key(page) {
                return Err(SettingsError::PageNotFound(page.to_string()).into());
            }
        }
        let mut layout_settings = self.layout_settings(layout_set)?;
        layout_settings.set_receipt_layout(page);
        self.save_settings(layout_set, &layout_settings)
    }

    /// Queues a save of `layout`, replacing any save queued before it.
    pub fn schedule_save(&mut self, layout_set: &str, page: &str, layout: InternalLayout, now: Instant) {
        self.pending_save
            .schedule((layout_set.to_string(), page.to_string()), layout, now);
    }

    pub fn has_pending_save(&self) -> bool {
        self.pending_save.is_pending()
    }

    /// Runs the queued save if the idle window has passed. Returns whether it ran.
    pub fn poll_pending_save(&mut self, now: Instant) -> Result<bool, EditorError> {
        match self.pending_save.poll(now) {
            Some(((layout_set, page), layout)) => {
                self.save_layout(&layout_set, &page, &layout)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Runs the queued save right away, unless its page has been deleted meanwhile.
    pub fn flush_pending_save(&mut self) -> Result<bool, EditorError> {
        let Some((layout_set, page)) = self.pending_save.pending_key().cloned() else {
            return Ok(false);
        };
        // A failed read keeps the save queued; only a deleted page discards it.
        let page_exists = self.store.load_form_layouts(&layout_set)?.contains_key(&page);
        match self.pending_save.flush(|_| page_exists) {
            Some(((layout_set, page), layout)) => {
                self.save_layout(&layout_set, &page, &layout)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drops the cache entries a process-task handler made stale: app metadata after
    /// data type changes, layout sets after layout set changes, and everything cached for
    /// a deleted layout set. Failed steps changed nothing and are skipped.
    pub fn invalidate_after_task(&mut self, report: &TaskHandlingReport) -> usize {
        let dropped = self
            .cache
            .invalidate_after_task(report, &self.config.org, &self.config.app);
        debug!(task = %report.task_id, entries = dropped, "Invalidated cache after task change");
        dropped
    }
}
