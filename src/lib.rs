//! # studio-layout - Form Layout Editing Engine
//!
//! **studio-layout** holds the model behind a visual form designer: the tree of pages,
//! containers and components a form is built from, the conversion to and from the flat
//! layout files an app stores on disk, and the bookkeeping that keeps an app consistent
//! while it is being edited.
//!
//! ## Core Workflow
//!
//! 1.  **Load**: Read the layout files of a layout set (`ExternalFormLayout`) and convert
//!     them with `convert_external_layouts` into `InternalLayout` trees. Pages that
//!     cannot be converted are reported instead of failing the whole set.
//! 2.  **Edit**: Apply pure mutations (`add_component`, `move_layout_item`, ...) that
//!     return new layouts, after checking them with the `validate` functions.
//! 3.  **Save**: Convert back with `internal_to_external` and persist. `LayoutEditor`
//!     does all of this against a `LayoutStore`, including navigation buttons, page
//!     settings and rule configuration.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use studio_layout::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EditorConfig::builder("ttd", "my-app").build();
//!     let mut editor = LayoutEditor::new(config, FsLayoutStore::new("App/ui"));
//!
//!     let id = editor.add_item("form", "page1", &ComponentType::Input, None, None, None)?;
//!     editor.rename_item("form", "page1", &id, "applicant-name")?;
//!     editor.add_page("form", "page2")?;
//!
//!     for invalid in editor.invalid_layouts("form") {
//!         println!("{} is invalid: {}", invalid.page, invalid.reason);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod component;
pub mod config;
pub mod convert;
pub mod debounce;
pub mod editor;
pub mod error;
pub mod layout;
pub mod mutate;
pub mod navigation;
pub mod prelude;
pub mod process;
pub mod rules;
pub mod settings;
pub mod validate;
