//! Configuration System
//!
//! Dashboard settings loaded from TOML. In the browser the document carries
//! the TOML inline; every field has a default so an empty document yields a
//! working dashboard.

use serde::Deserialize;
use std::time::Duration;

use crate::poller::PollTask;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct DashboardConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend location
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Prefix joined in front of every endpoint path; empty means same origin
    #[serde(default)]
    pub base_url: String,
}

impl ApiConfig {
    /// Full URL for an endpoint path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Poll cadence per endpoint, in milliseconds
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PollingConfig {
    #[serde(default = "default_realtime_ms")]
    pub realtime_ms: u64,

    #[serde(default = "default_totals_ms")]
    pub totals_ms: u64,

    #[serde(default = "default_daily_ms")]
    pub daily_ms: u64,

    #[serde(default = "default_hourly_ms")]
    pub hourly_ms: u64,

    #[serde(default = "default_pie_ms")]
    pub pie_ms: u64,

    /// Unset: the prediction is fetched once per session start
    #[serde(default)]
    pub prediction_ms: Option<u64>,
}

fn default_realtime_ms() -> u64 {
    3000
}

fn default_totals_ms() -> u64 {
    6000
}

fn default_daily_ms() -> u64 {
    6000
}

fn default_hourly_ms() -> u64 {
    60_000
}

fn default_pie_ms() -> u64 {
    60_000
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            realtime_ms: default_realtime_ms(),
            totals_ms: default_totals_ms(),
            daily_ms: default_daily_ms(),
            hourly_ms: default_hourly_ms(),
            pie_ms: default_pie_ms(),
            prediction_ms: None,
        }
    }
}

impl PollingConfig {
    /// Repeat period for a task, `None` for start-only tasks
    pub fn period(&self, task: PollTask) -> Option<Duration> {
        let ms = match task {
            PollTask::Realtime => Some(self.realtime_ms),
            PollTask::Prediction => self.prediction_ms,
            PollTask::Totals => Some(self.totals_ms),
            PollTask::Daily => Some(self.daily_ms),
            PollTask::Hourly => Some(self.hourly_ms),
            PollTask::Pie => Some(self.pie_ms),
        };
        ms.map(Duration::from_millis)
    }
}

/// Formatting and widget settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// ISO 4217 code used for cost cells and the summary card
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Points kept per hourly series
    #[serde(default = "default_history_points")]
    pub history_points: usize,

    /// Rooms sharing the daily total for the average widget
    #[serde(default = "default_rooms")]
    pub rooms: u32,

    #[serde(default = "default_daily_target")]
    pub daily_target_kwh: f64,

    #[serde(default = "default_monthly_target")]
    pub monthly_target_kwh: f64,
}

fn default_currency() -> String {
    "IDR".to_string()
}

fn default_history_points() -> usize {
    30
}

fn default_rooms() -> u32 {
    4
}

fn default_daily_target() -> f64 {
    300.0
}

fn default_monthly_target() -> f64 {
    7500.0
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            history_points: default_history_points(),
            rooms: default_rooms(),
            daily_target_kwh: default_daily_target(),
            monthly_target_kwh: default_monthly_target(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl DashboardConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the dashboard cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.polling;
        let intervals = [
            ("realtime_ms", Some(p.realtime_ms)),
            ("totals_ms", Some(p.totals_ms)),
            ("daily_ms", Some(p.daily_ms)),
            ("hourly_ms", Some(p.hourly_ms)),
            ("pie_ms", Some(p.pie_ms)),
            ("prediction_ms", p.prediction_ms),
        ];
        for (name, value) in intervals {
            if value == Some(0) {
                return Err(ConfigError::Invalid(format!(
                    "polling.{} must be greater than zero",
                    name
                )));
            }
        }

        let d = &self.display;
        if d.history_points == 0 {
            return Err(ConfigError::Invalid(
                "display.history_points must be greater than zero".to_string(),
            ));
        }
        if d.rooms == 0 {
            return Err(ConfigError::Invalid(
                "display.rooms must be greater than zero".to_string(),
            ));
        }
        let targets_positive = d.daily_target_kwh > 0.0 && d.monthly_target_kwh > 0.0;
        if !targets_positive {
            return Err(ConfigError::Invalid(
                "display targets must be positive".to_string(),
            ));
        }
        if d.currency.len() != 3 || !d.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::Invalid(format!(
                "display.currency {:?} is not an ISO 4217 code",
                d.currency
            )));
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Generate a default config document
pub fn generate_default_config() -> String {
    r#"# Wattboard Configuration
#
# Embed in the dashboard page as:
#   <script id="wattboard-config" type="application/toml"> ... </script>
# localStorage key `wattboard_api_url` overrides api.base_url.

[api]
# Prefix for endpoint paths; empty means same origin
base_url = ""

[polling]
# Live per-department readings (ms)
realtime_ms = 3000

# Monthly and daily totals (ms)
totals_ms = 6000
daily_ms = 6000

# Hourly line chart and room share doughnut (ms)
hourly_ms = 60000
pie_ms = 60000

# Cost prediction; leave unset to fetch once per session start
# prediction_ms = 60000

[display]
# Currency for cost values
currency = "IDR"

# Points kept per hourly series
history_points = 30

# Rooms sharing the daily total in the average widget
rooms = 4

# Progress bar targets (kWh)
daily_target_kwh = 300.0
monthly_target_kwh = 7500.0

[logging]
# Log level: trace, debug, info, warn, error
level = "info"
"#
    .to_string()
}
