pub mod config;
pub mod item;
pub mod kind;

pub use config::*;
pub use item::*;
pub use kind::*;
