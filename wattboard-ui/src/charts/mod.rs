//! Chart.js Bindings
//!
//! Browser implementations of the dashboard's chart seams.

pub mod chartjs;

pub use chartjs::{CanvasDoughnutHost, CanvasLineChart};
