//! Prelude module for convenient imports
//!
//! Re-exports the types and functions most callers need, so a single
//! `use studio_layout::prelude::*;` is enough to load, edit and save layouts.

// Model
pub use crate::component::{ComponentType, FormComponent, FormContainer, FormItem, JsonObject};
pub use crate::layout::{
    BASE_CONTAINER_ID, FormLayouts, InternalLayout, check_integrity,
    find_layouts_containing_duplicate_components,
};

// Conversion
pub use crate::convert::{
    ConvertedLayouts, ExternalComponent, ExternalFormLayout, ExternalLayouts, InvalidLayout,
    LoadedLayouts, convert_external_layouts, convert_internal_layouts, convert_loaded_layouts,
    external_to_internal, internal_to_external,
};

// Editing
pub use crate::config::{DEFAULT_LAYOUT_SCHEMA_URL, EditorConfig};
pub use crate::editor::{FsLayoutStore, LayoutEditor, LayoutStore, MemoryStore};
pub use crate::mutate::*;
pub use crate::navigation::{
    NavigationOutcome, add_or_remove_navigation_buttons, generate_component_id,
    reconcile_navigation_buttons,
};
pub use crate::rules::RuleConfig;
pub use crate::settings::LayoutSettings;

// Error types
pub use crate::error::{
    BackendError, ConversionError, EditorError, LayoutError, NavigationError, ProcessError,
    SettingsError, ValidationError,
};
