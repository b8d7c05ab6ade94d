//! Telemetry records decoded from backend JSON
//!
//! Every record is built fresh from one poll response and dropped once it
//! has been rendered. Numeric fields default to zero when absent.

pub mod de;
pub mod realtime;
pub mod series;
pub mod totals;

pub use realtime::{
    Department, DepartmentTotal, FooterMetric, Metric, Phase, PhaseReading, RealtimeSnapshot,
    Summary,
};
pub use series::{ChartUnit, HourlyPayload, PieData, ROOMS};
pub use totals::{CostPrediction, PeriodTotals};
