//! Chart payloads from `/get_hourly` and `/get_pie`

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::de;
use crate::error::{FetchError, FetchResult};

/// Room series names, in chart order
pub const ROOMS: [&str; 4] = ["Ruang 1", "Ruang 2", "Ruang 3", "Ruang 4"];

/// Unit selectable on the hourly chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartUnit {
    #[default]
    Energy,
    Voltage,
    Current,
    Frequency,
}

impl ChartUnit {
    pub const ALL: [ChartUnit; 4] = [
        ChartUnit::Energy,
        ChartUnit::Voltage,
        ChartUnit::Current,
        ChartUnit::Frequency,
    ];

    /// Payload key, also the selector option value and the unit label
    pub fn key(&self) -> &'static str {
        match self {
            ChartUnit::Energy => "kWh",
            ChartUnit::Voltage => "V",
            ChartUnit::Current => "A",
            ChartUnit::Frequency => "Hz",
        }
    }
}

impl fmt::Display for ChartUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ChartUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartUnit::ALL
            .into_iter()
            .find(|unit| unit.key() == s)
            .ok_or_else(|| format!("unknown chart unit: {}", s))
    }
}

/// Decoded `/get_hourly` response: shared labels plus per-unit room series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlyPayload {
    pub labels: Vec<String>,
    units: HashMap<ChartUnit, HashMap<String, Vec<Option<f64>>>>,
}

impl HourlyPayload {
    /// Payload with the given labels and no series yet
    pub fn new(labels: Vec<String>) -> Self {
        Self {
            labels,
            units: HashMap::new(),
        }
    }

    /// Decode a `/get_hourly` body. Missing units or rooms read as empty.
    pub fn from_value(value: Value) -> FetchResult<Self> {
        let Value::Object(root) = value else {
            return Err(FetchError::Malformed(format!(
                "hourly payload is {}, expected an object",
                de::kind(&value)
            )));
        };

        let labels = match root.get("labels") {
            Some(Value::Array(items)) => items.iter().map(de::coerce_text).collect(),
            _ => Vec::new(),
        };

        let mut units = HashMap::new();
        for unit in ChartUnit::ALL {
            let Some(Value::Object(rooms)) = root.get(unit.key()) else {
                continue;
            };
            let series = rooms
                .iter()
                .filter_map(|(room, points)| match points {
                    Value::Array(points) => Some((
                        room.clone(),
                        points.iter().map(de::coerce_optional).collect(),
                    )),
                    _ => None,
                })
                .collect();
            units.insert(unit, series);
        }

        Ok(Self { labels, units })
    }

    /// Points for one room in one unit, empty when absent
    pub fn series(&self, unit: ChartUnit, room: &str) -> &[Option<f64>] {
        self.units
            .get(&unit)
            .and_then(|rooms| rooms.get(room))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Builder used by tests and benches
    pub fn with_series(mut self, unit: ChartUnit, room: &str, points: Vec<Option<f64>>) -> Self {
        self.units
            .entry(unit)
            .or_default()
            .insert(room.to_string(), points);
        self
    }
}

/// Decoded `/get_pie` response: per-room share of monthly energy
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PieData {
    #[serde(default, deserialize_with = "de::text_list")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "de::number_list")]
    pub values: Vec<f64>,
}
