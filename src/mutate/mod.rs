//! Pure mutations of a layout tree.
//!
//! Every function takes the layout by reference and returns a new one, leaving the input
//! untouched. Operations that can only fail through a programming error (unknown ids,
//! cyclic moves) return a `LayoutError`; the add/remove family degrades to a no-op
//! instead, so the tree invariants hold after any sequence of calls.

mod add;
mod remove;
mod update;

pub use add::{add_component, add_container, add_item_of_type, add_navigation_buttons};
pub use remove::{remove_component, remove_components, remove_components_by_type, remove_container};
pub use update::{
    move_layout_item, update_component, update_component_id, update_container, update_container_id,
};
