//! Browser Logging
//!
//! `tracing` events from the dashboard core are forwarded to the `log`
//! facade and printed by `console_log` at the event's level.

use std::str::FromStr;
use wattboard::LoggingConfig;

/// Console level for a configured name, `info` when unrecognized
pub fn console_level(level: &str) -> log::Level {
    log::Level::from_str(level.trim()).unwrap_or(log::Level::Info)
}

/// Initialize logging from the dashboard config
pub fn init(config: &LoggingConfig) {
    if console_log::init_with_level(console_level(&config.level)).is_err() {
        web_sys::console::warn_1(&"Logging already initialized".into());
    }
}
