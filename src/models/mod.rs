//! Core data models.
//!
//! Models are independent of UI and business logic: the fixed button set
//! and the binding table the session mutates.

pub mod bindings;
pub mod button;

// Re-export all model types
pub use bindings::BindingTable;
pub use button::{Button, BUTTONS};
