//! DOM Access
//!
//! Builds the dashboard's view-binding table from the page markup.

pub mod bindings;

pub use bindings::{build_bindings, DomNode};
