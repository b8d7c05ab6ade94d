//! Aggregates from `/get_totals`, `/get_daily` and `/index/prediksi`

use serde::Deserialize;

use super::de;

/// Energy used and amount billed over a period (month or day)
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct PeriodTotals {
    #[serde(rename = "total_energi", default, deserialize_with = "de::number_or_zero")]
    pub energy_kwh: f64,
    #[serde(rename = "total_tagihan", default, deserialize_with = "de::number_or_zero")]
    pub bill: f64,
}

/// Predicted cost for the running month
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct CostPrediction {
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub cost_pred: f64,
}
