//! API Layer
//!
//! HTTP transport to the metering backend and config bootstrap.

pub mod client;

pub use client::{apply_api_override, config_source, HttpBackend};
