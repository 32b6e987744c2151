use thiserror::Error;

/// Structural errors raised while querying or mutating a layout tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Item '{0}' does not exist in the layout")]
    ItemNotFound(String),

    #[error("Container '{0}' does not exist in the layout")]
    ContainerNotFound(String),

    #[error("The id '{0}' is already in use in the layout")]
    IdAlreadyInUse(String),

    #[error("Moving '{item_id}' into '{target_id}' would make the container its own descendant")]
    CyclicMove { item_id: String, target_id: String },

    #[error("The base container cannot be {0}")]
    BaseContainerImmutable(&'static str),

    #[error("Item '{0}' is referenced in the order of the layout, but has no record")]
    DanglingReference(String),

    #[error("Item '{id}' appears {count} times across the order of the layout")]
    MultipleParents { id: String, count: usize },

    #[error("Item '{0}' is not reachable from the base container")]
    Unreachable(String),
}

/// Errors that can occur while converting an external layout file into the internal model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Failed to parse layout JSON: {0}")]
    JsonParseError(String),

    #[error("The layout contains duplicated ids: {}", .0.join(", "))]
    DuplicateIds(Vec<String>),

    #[error("The layout contains items that are not reachable from the base container: {}", .0.join(", "))]
    UnreachableItems(Vec<String>),
}

/// Inline validation failures. They block a save, but are not programming errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("The id must not be empty")]
    EmptyId,

    #[error("The id '{0}' contains characters that are not allowed")]
    InvalidIdCharacters(String),

    #[error("The id '{0}' is already used on page '{1}'")]
    DuplicateId(String, String),

    #[error("Components of type '{child_type}' cannot be placed inside '{parent_id}'")]
    InvalidChild { parent_id: String, child_type: String },

    #[error("The container nesting depth would be {depth}, but at most {max} is allowed")]
    DepthExceeded { depth: usize, max: usize },

    #[error("Container '{0}' must have at least one table header")]
    EmptyTableHeaders(String),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Errors raised by the navigation-button reconciler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Layout with name '{0}' does not exist")]
    PageNotFound(String),
}

/// Errors raised while editing the layout settings or the page collection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Page '{0}' does not exist")]
    PageNotFound(String),

    #[error("Page '{0}' already exists")]
    PageExists(String),
}

/// Errors reported by an external backend (REST API, file system, ...).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Malformed payload: {0}")]
    Payload(String),
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Payload(err.to_string())
    }
}

/// Errors raised by the process-task handlers before any backend call is issued.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("Task '{task_id}' of type '{task_type}' has no {missing} configuration")]
    MissingConfiguration {
        task_id: String,
        task_type: String,
        missing: &'static str,
    },
}

/// Errors surfaced by the layout editor service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Page '{page}' of layout set '{layout_set}' is invalid: {source}")]
    InvalidPage {
        layout_set: String,
        page: String,
        source: ConversionError,
    },

    #[error("Failed to persist pages: {}", .0.join(", "))]
    PartialSave(Vec<String>),
}

/// Errors raised while loading an `EditorConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Could not parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("Invalid config value '{field}': {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
