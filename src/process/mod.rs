//! Side effects of editing the process diagram.
//!
//! Adding or removing a BPMN task means the app needs (or no longer needs) data types,
//! a layout set and sometimes a policy rule. The managers here translate a task event
//! into those backend mutations and report how each one went.

pub mod backend;
pub mod handlers;
pub mod model;
pub mod report;

pub use backend::*;
pub use handlers::*;
pub use model::*;
pub use report::*;
