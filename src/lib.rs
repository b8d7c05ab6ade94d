//! # Wattboard
//!
//! Electricity metering dashboard - the platform-neutral half of the
//! wattboard web client. Polls a metering backend for per-room, per-phase
//! readings, formats them for Indonesian users and shapes chart datasets.
//!
//! ## Features
//!
//! - **Lenient decoding**: missing or `null` numbers read as zero
//! - **Typed view binding**: DOM nodes looked up once, addressed by [`Slot`]
//! - **Chart shaping**: per-unit series cache with history truncation
//! - **Session lifecycle**: restartable timers and abortable requests
//!
//! ## Modules
//!
//! - [`model`]: Telemetry records decoded from backend JSON
//! - [`format`]: Unit, currency and date formatting
//! - [`view`]: Slot → node binding table
//! - [`render`]: Payload → view writes
//! - [`chart`]: Line and doughnut chart adapters
//! - [`poller`]: Endpoint table and abortable poll cycle
//! - [`session`]: Timers and in-flight requests
//! - [`dashboard`]: Routes poll outcomes to renderers and charts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wattboard::{decode, PollTask, Renderer, DisplayConfig, Slot, ViewSurface};
//! use wattboard::Payload;
//!
//! struct Log;
//!
//! impl ViewSurface for Log {
//!     fn set_text(&mut self, slot: &Slot, text: &str) -> bool {
//!         println!("{:?} = {}", slot, text);
//!         true
//!     }
//!
//!     fn set_width(&mut self, slot: &Slot, percent: f64) -> bool {
//!         println!("{:?} = {}%", slot, percent);
//!         true
//!     }
//! }
//!
//! let body = serde_json::json!({"total_energi": 12.5, "total_tagihan": 18000});
//! if let Ok(Payload::Daily(totals)) = decode(PollTask::Daily, body) {
//!     Renderer::new(&DisplayConfig::default()).render_daily(&mut Log, &totals);
//! }
//! ```

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod model;
pub mod poller;
pub mod render;
pub mod session;
pub mod status;
pub mod view;

// Re-export top-level types for convenience
pub use chart::{DoughnutHost, HourlyChart, LineChart, LineDataset, PieChart, SeriesCache};

pub use config::{
    generate_default_config, ApiConfig, ConfigError, DashboardConfig, DisplayConfig,
    LoggingConfig, PollingConfig,
};

pub use dashboard::Dashboard;

pub use error::{FetchError, FetchResult};

pub use model::{ChartUnit, FooterMetric, Metric, Phase, RealtimeSnapshot};

pub use poller::{decode, fetch, Backend, Payload, PollOutcome, PollTask};

pub use render::Renderer;

pub use session::{PollSession, RequestId, Scheduler, SessionState};

pub use status::{Banner, BannerKind, BannerTicket, StatusBoard, StatusSink};

pub use view::{Slot, TextNode, ViewBindings, ViewSurface};
