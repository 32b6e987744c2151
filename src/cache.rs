//! Client-side cache of fetched resources.
//!
//! Entries are keyed by resource kind, app and optionally layout set. The editor reads
//! through the cache and invalidates the affected entries after every successful save.

use crate::layout::FormLayouts;
use crate::process::{ApplicationMetadata, LayoutSets, TaskHandlingReport, TaskStep};
use crate::rules::RuleConfig;
use crate::settings::LayoutSettings;
use ahash::AHashMap;
use std::fmt;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryResource {
    FormLayouts,
    LayoutSettings,
    RuleConfig,
    AppMetadata,
    LayoutSets,
}

impl fmt::Display for QueryResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryResource::FormLayouts => "formLayouts",
            QueryResource::LayoutSettings => "layoutSettings",
            QueryResource::RuleConfig => "ruleConfig",
            QueryResource::AppMetadata => "appMetadata",
            QueryResource::LayoutSets => "layoutSets",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: QueryResource,
    pub org: String,
    pub app: String,
    pub layout_set: Option<String>,
}

impl QueryKey {
    pub fn new(resource: QueryResource, org: &str, app: &str, layout_set: Option<&str>) -> Self {
        Self {
            resource,
            org: org.to_string(),
            app: app.to_string(),
            layout_set: layout_set.map(str::to_string),
        }
    }

    fn belongs_to(&self, resource: QueryResource, org: &str, app: &str) -> bool {
        self.resource == resource && self.org == org && self.app == app
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    FormLayouts(FormLayouts),
    LayoutSettings(LayoutSettings),
    RuleConfig(RuleConfig),
    AppMetadata(ApplicationMetadata),
    LayoutSets(LayoutSets),
}

impl CachedValue {
    pub fn as_form_layouts(&self) -> Option<&FormLayouts> {
        match self {
            CachedValue::FormLayouts(layouts) => Some(layouts),
            _ => None,
        }
    }

    pub fn as_layout_settings(&self) -> Option<&LayoutSettings> {
        match self {
            CachedValue::LayoutSettings(settings) => Some(settings),
            _ => None,
        }
    }

    pub fn as_rule_config(&self) -> Option<&RuleConfig> {
        match self {
            CachedValue::RuleConfig(config) => Some(config),
            _ => None,
        }
    }

    pub fn as_app_metadata(&self) -> Option<&ApplicationMetadata> {
        match self {
            CachedValue::AppMetadata(metadata) => Some(metadata),
            _ => None,
        }
    }

    pub fn as_layout_sets(&self) -> Option<&LayoutSets> {
        match self {
            CachedValue::LayoutSets(sets) => Some(sets),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    entries: AHashMap<QueryKey, CachedValue>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &QueryKey) -> Option<&CachedValue> {
        self.entries.get(key)
    }

    /// Stores a value, replacing whatever was cached for the key.
    pub fn set(&mut self, key: QueryKey, value: CachedValue) {
        trace!(resource = %key.resource, layout_set = ?key.layout_set, "Cached query result");
        self.entries.insert(key, value);
    }

    pub fn invalidate(&mut self, key: &QueryKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drops every entry of a resource for the app, whatever the layout set.
    pub fn invalidate_resource(&mut self, resource: QueryResource, org: &str, app: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.belongs_to(resource, org, app));
        before - self.entries.len()
    }

    /// Drops every entry cached for one layout set of the app.
    pub fn invalidate_layout_set(&mut self, org: &str, app: &str, layout_set: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| {
            !(key.org == org && key.app == app && key.layout_set.as_deref() == Some(layout_set))
        });
        before - self.entries.len()
    }

    /// Drops what the successful steps of a process-task handler made stale.
    pub fn invalidate_after_task(&mut self, report: &TaskHandlingReport, org: &str, app: &str) -> usize {
        let mut dropped = 0;
        for step in report.steps.iter().filter(|s| s.result.is_ok()) {
            dropped += match &step.step {
                TaskStep::AddDataType(_) | TaskStep::DeleteDataType(_) => {
                    self.invalidate_resource(QueryResource::AppMetadata, org, app)
                }
                TaskStep::AddLayoutSet(_) => self.invalidate_resource(QueryResource::LayoutSets, org, app),
                TaskStep::DeleteLayoutSet(id) => {
                    self.invalidate_resource(QueryResource::LayoutSets, org, app)
                        + self.invalidate_layout_set(org, app, id)
                }
                TaskStep::AddPolicyRule(_)
                | TaskStep::DeletePolicyRule(_)
                | TaskStep::ScrubUniqueSignatures { .. } => 0,
            };
        }
        dropped
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
