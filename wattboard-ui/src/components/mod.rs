//! UI Components
//!
//! Leptos components mounted into the server-rendered dashboard page.

pub mod status;

pub use status::StatusBanners;
