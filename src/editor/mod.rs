//! The layout editing service and the stores it persists through.

pub mod fs;
pub mod service;
pub mod store;

pub use fs::FsLayoutStore;
pub use service::LayoutEditor;
pub use store::{LayoutSetFiles, LayoutStore, MemoryStore};
