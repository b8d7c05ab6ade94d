//! State Management
//!
//! Reactive status state shared by the poller and the banner view.

pub mod status;

pub use status::SignalStatus;
