use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// The schema URL written into layout files that do not declare one.
pub const DEFAULT_LAYOUT_SCHEMA_URL: &str =
    "https://altinncdn.no/schemas/json/layout/layout.schema.v1.json";

/// Settings shared by the editor service, the validators and the reconciler.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Owner organisation of the app being edited.
    pub org: String,
    /// Name of the app being edited.
    pub app: String,
    pub layout_schema_url: String,
    /// How many containers may be nested inside each other below the base container.
    /// A value of 1 allows a group inside a group, but nothing deeper.
    pub max_container_depth: usize,
    /// Number of random characters appended to generated component ids.
    pub generated_id_length: usize,
    /// Idle window of the debounced save, in milliseconds.
    pub save_debounce_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            org: String::new(),
            app: String::new(),
            layout_schema_url: DEFAULT_LAYOUT_SCHEMA_URL.to_string(),
            max_container_depth: 1,
            generated_id_length: 6,
            save_debounce_ms: 400,
        }
    }
}

impl EditorConfig {
    pub fn builder(org: &str, app: &str) -> EditorConfigBuilder {
        EditorConfigBuilder::new(org, app)
    }

    /// Loads a config from a JSON file. Missing fields fall back to their defaults.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the editor cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generated_id_length == 0 {
            return Err(ConfigError::Invalid {
                field: "generatedIdLength",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }
}

pub struct EditorConfigBuilder {
    config: EditorConfig,
}

impl EditorConfigBuilder {
    pub fn new(org: &str, app: &str) -> Self {
        Self {
            config: EditorConfig {
                org: org.to_string(),
                app: app.to_string(),
                ..EditorConfig::default()
            },
        }
    }

    pub fn with_layout_schema_url(mut self, url: &str) -> Self {
        self.config.layout_schema_url = url.to_string();
        self
    }

    pub fn with_max_container_depth(mut self, depth: usize) -> Self {
        self.config.max_container_depth = depth;
        self
    }

    pub fn with_generated_id_length(mut self, length: usize) -> Self {
        self.config.generated_id_length = length.max(1);
        self
    }

    pub fn with_save_debounce(mut self, window: Duration) -> Self {
        self.config.save_debounce_ms = window.as_millis() as u64;
        self
    }

    pub fn build(self) -> EditorConfig {
        self.config
    }
}
