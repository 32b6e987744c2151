use super::store::LayoutStore;
use crate::convert::{ExternalFormLayout, ExternalLayouts, LoadedLayouts};
use crate::error::{BackendError, ConversionError};
use crate::rules::RuleConfig;
use crate::settings::LayoutSettings;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const LAYOUTS_DIR: &str = "layouts";
const SETTINGS_FILE: &str = "Settings.json";
const RULE_CONFIG_FILE: &str = "RuleConfiguration.json";

/// Layout sets in an app checkout: `<root>/<layoutSet>/layouts/<page>.json`, with
/// `Settings.json` and `RuleConfiguration.json` next to the `layouts` directory.
#[derive(Debug, Clone)]
pub struct FsLayoutStore {
    root: PathBuf,
}

impl FsLayoutStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn set_dir(&self, layout_set: &str) -> PathBuf {
        self.root.join(layout_set)
    }

    fn page_path(&self, layout_set: &str, page: &str) -> PathBuf {
        self.set_dir(layout_set)
            .join(LAYOUTS_DIR)
            .join(format!("{page}.json"))
    }

    /// Lists the layout sets under the root, sorted.
    pub fn layout_sets(&self) -> Result<Vec<String>, BackendError> {
        let mut sets = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.path().join(LAYOUTS_DIR).is_dir() {
                sets.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        sets.sort();
        Ok(sets)
    }
}

/// Reads a JSON file, returning `None` when it does not exist.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, BackendError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), BackendError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    info!(path = %path.display(), "Wrote file");
    Ok(())
}

impl LayoutStore for FsLayoutStore {
    fn get_form_layouts(&self, layout_set: &str) -> Result<ExternalLayouts, BackendError> {
        self.load_form_layouts(layout_set)?
            .into_iter()
            .map(|(page, loaded)| match loaded {
                Ok(layout) => Ok((page, layout)),
                Err(err) => Err(BackendError::Payload(format!("page '{page}': {err}"))),
            })
            .collect()
    }

    fn load_form_layouts(&self, layout_set: &str) -> Result<LoadedLayouts, BackendError> {
        let dir = self.set_dir(layout_set).join(LAYOUTS_DIR);
        if !dir.is_dir() {
            return Err(BackendError::NotFound(format!("layout set '{layout_set}'")));
        }
        let mut pages = LoadedLayouts::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(page) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let content = fs::read_to_string(&path)?;
            let layout = ExternalFormLayout::from_json(&content).map_err(|err| {
                warn!(path = %path.display(), "Layout file is not valid JSON: {}", err);
                ConversionError::JsonParseError(err.to_string())
            });
            pages.insert(page.to_string(), layout);
        }
        debug!(layout_set = %layout_set, pages = pages.len(), "Read layout files");
        Ok(pages)
    }

    fn save_form_layout(
        &mut self,
        layout_set: &str,
        page: &str,
        layout: &ExternalFormLayout,
    ) -> Result<(), BackendError> {
        write_json(&self.page_path(layout_set, page), layout)
    }

    fn delete_form_layout(&mut self, layout_set: &str, page: &str) -> Result<(), BackendError> {
        let path = self.page_path(layout_set, page);
        fs::remove_file(&path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => BackendError::NotFound(format!("page '{page}'")),
            _ => err.into(),
        })?;
        info!(path = %path.display(), "Deleted file");
        Ok(())
    }

    fn get_layout_settings(&self, layout_set: &str) -> Result<LayoutSettings, BackendError> {
        let settings = read_json(&self.set_dir(layout_set).join(SETTINGS_FILE))?;
        Ok(settings.unwrap_or_default())
    }

    fn save_layout_settings(
        &mut self,
        layout_set: &str,
        settings: &LayoutSettings,
    ) -> Result<(), BackendError> {
        write_json(&self.set_dir(layout_set).join(SETTINGS_FILE), settings)
    }

    fn get_rule_config(&self, layout_set: &str) -> Result<RuleConfig, BackendError> {
        let config = read_json(&self.set_dir(layout_set).join(RULE_CONFIG_FILE))?;
        Ok(config.unwrap_or_default())
    }

    fn save_rule_config(
        &mut self,
        layout_set: &str,
        config: &RuleConfig,
    ) -> Result<(), BackendError> {
        write_json(&self.set_dir(layout_set).join(RULE_CONFIG_FILE), config)
    }
}
