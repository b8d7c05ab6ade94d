//! Wattboard Dashboard
//!
//! Electricity metering dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - Live per-department phase readings every few seconds
//! - Monthly and daily totals with target progress bars
//! - Hourly per-room line chart with unit switching
//! - Room share doughnut chart
//! - Polling paused while the tab is hidden
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) application that compiles to
//! WebAssembly. It binds to the server-rendered dashboard page, polls the
//! metering backend over HTTP and writes into the existing markup; only
//! the status banners are Leptos views.

mod api;
mod app;
mod charts;
mod components;
mod dom;
mod logging;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    let config = app::load_config();
    app::run(config);
}
