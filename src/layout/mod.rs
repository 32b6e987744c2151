pub mod model;
pub mod query;

pub use model::*;
pub use query::*;
