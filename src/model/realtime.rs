//! Live readings from `/realtime`
//!
//! One snapshot per poll: every department's per-phase meter readings, the
//! department's month-to-date total and the building-wide summary card.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

use super::de;
use crate::error::{FetchError, FetchResult};

/// Electrical phase of a three-phase supply
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    R,
    S,
    T,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::R, Phase::S, Phase::T];

    /// Map a sensor key to its phase.
    ///
    /// Meters report as `PZEM1..3`; the TimescaleDB backend already emits
    /// the phase letter.
    pub fn from_sensor_key(key: &str) -> Option<Self> {
        match key {
            "PZEM1" | "r" | "R" => Some(Phase::R),
            "PZEM2" | "s" | "S" => Some(Phase::S),
            "PZEM3" | "t" | "T" => Some(Phase::T),
            _ => None,
        }
    }

    /// Value of the `data-phase` attribute
    pub fn as_attr(&self) -> &'static str {
        match self {
            Phase::R => "r",
            Phase::S => "s",
            Phase::T => "t",
        }
    }

    pub fn from_attr(attr: &str) -> Option<Self> {
        match attr {
            "r" => Some(Phase::R),
            "s" => Some(Phase::S),
            "t" => Some(Phase::T),
            _ => None,
        }
    }
}

/// Quantity shown in a phase cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Voltage,
    Current,
    Power,
    Energy,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::Voltage, Metric::Current, Metric::Power, Metric::Energy];

    /// Value of the `data-metric` attribute
    pub fn as_attr(&self) -> &'static str {
        match self {
            Metric::Voltage => "voltage",
            Metric::Current => "current",
            Metric::Power => "power",
            Metric::Energy => "energy",
        }
    }

    pub fn from_attr(attr: &str) -> Option<Self> {
        match attr {
            "voltage" => Some(Metric::Voltage),
            "current" => Some(Metric::Current),
            "power" => Some(Metric::Power),
            "energy" => Some(Metric::Energy),
            _ => None,
        }
    }
}

/// Quantity shown in a department footer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FooterMetric {
    TotalEnergy,
    TotalCost,
}

impl FooterMetric {
    pub fn as_attr(&self) -> &'static str {
        match self {
            FooterMetric::TotalEnergy => "total_energy",
            FooterMetric::TotalCost => "total_cost",
        }
    }

    pub fn from_attr(attr: &str) -> Option<Self> {
        match attr {
            "total_energy" => Some(FooterMetric::TotalEnergy),
            "total_cost" => Some(FooterMetric::TotalCost),
            _ => None,
        }
    }
}

/// One meter's latest reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct PhaseReading {
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub voltage: f64,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub current: f64,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub power: f64,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub energy: f64,
}

impl PhaseReading {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Voltage => self.voltage,
            Metric::Current => self.current,
            Metric::Power => self.power,
            Metric::Energy => self.energy,
        }
    }
}

/// Month-to-date consumption of one department
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct DepartmentTotal {
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub total_energy: f64,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub total_cost: f64,
}

/// A metered department (room/building) with up to three phases
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Department {
    #[serde(default, deserialize_with = "de::text")]
    pub id: String,
    #[serde(default, deserialize_with = "phases")]
    pub phases: BTreeMap<Phase, PhaseReading>,
    #[serde(default, deserialize_with = "de::optional_record")]
    pub total: Option<DepartmentTotal>,
}

fn phases<'de, D>(deserializer: D) -> Result<BTreeMap<Phase, PhaseReading>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut phases = BTreeMap::new();
    let Some(Value::Object(raw)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(phases);
    };

    for (key, reading) in raw {
        let Some(phase) = Phase::from_sensor_key(&key) else {
            continue;
        };
        if let Some(reading) = de::record::<PhaseReading>(reading) {
            phases.insert(phase, reading);
        }
    }

    Ok(phases)
}

/// Building-wide card for the current month
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Summary {
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub overall_energy: f64,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub overall_cost: f64,
    /// English month name as sent by the backend
    #[serde(default, deserialize_with = "de::text")]
    pub month: String,
    #[serde(default, deserialize_with = "de::text")]
    pub year: String,
}

/// Decoded `/realtime` response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RealtimeSnapshot {
    pub departments: Vec<Department>,
    pub summary: Option<Summary>,
}

impl RealtimeSnapshot {
    /// Decode a `/realtime` body.
    ///
    /// A missing or non-array `departments` rejects the whole snapshot;
    /// individual departments that fail to decode are skipped.
    pub fn from_value(value: Value) -> FetchResult<Self> {
        let Value::Object(mut root) = value else {
            return Err(FetchError::Malformed(format!(
                "realtime payload is {}, expected an object",
                de::kind(&value)
            )));
        };

        let items = match root.remove("departments") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(FetchError::Malformed(format!(
                    "departments is {}, expected an array",
                    de::kind(&other)
                )))
            }
            None => return Err(FetchError::Malformed("departments is missing".to_string())),
        };

        let departments = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value::<Department>(item) {
                Ok(dept) => Some(dept),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping malformed department");
                    None
                }
            })
            .collect();

        let summary = match root.remove("summary") {
            None | Some(Value::Null) => None,
            Some(raw) => match serde_json::from_value::<Summary>(raw) {
                Ok(summary) => Some(summary),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring malformed summary");
                    None
                }
            },
        };

        Ok(Self {
            departments,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_full_snapshot() {
        let snapshot = RealtimeSnapshot::from_value(json!({
            "success": true,
            "departments": [{
                "id": "GD-A",
                "phases": {
                    "PZEM1": {"voltage": 220.4, "current": 1.5, "power": 0.33, "energy": 12.25},
                    "PZEM2": {"voltage": 219.9, "current": 1.1, "power": 0.24, "energy": 9.5},
                    "PZEM3": {"voltage": 221.0, "current": 0.9, "power": 0.2, "energy": 7.0}
                },
                "total": {"total_energy": 28.75, "total_cost": 41535.0}
            }],
            "summary": {"overall_energy": 28.75, "overall_cost": 41535, "month": "March", "year": 2026}
        }))
        .unwrap();

        assert_eq!(snapshot.departments.len(), 1);
        let dept = &snapshot.departments[0];
        assert_eq!(dept.id, "GD-A");
        assert_eq!(dept.phases.len(), 3);
        assert_eq!(dept.phases[&Phase::S].voltage, 219.9);
        assert_eq!(dept.total.unwrap().total_cost, 41535.0);

        let summary = snapshot.summary.unwrap();
        assert_eq!(summary.month, "March");
        assert_eq!(summary.year, "2026");
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let snapshot = RealtimeSnapshot::from_value(json!({
            "departments": [{"id": 7, "phases": {"PZEM1": {"voltage": null, "power": "1.5"}}}]
        }))
        .unwrap();

        let dept = &snapshot.departments[0];
        assert_eq!(dept.id, "7");
        let r = dept.phases[&Phase::R];
        assert_eq!(r, PhaseReading { voltage: 0.0, current: 0.0, power: 1.5, energy: 0.0 });
        assert!(dept.total.is_none());
        assert!(snapshot.summary.is_none());
    }

    #[test]
    fn test_odd_total_keeps_department() {
        let snapshot = RealtimeSnapshot::from_value(json!({
            "departments": [{
                "id": "GD-A",
                "phases": {"PZEM1": {"voltage": 220}, "PZEM2": 5, "PZEM3": null},
                "total": 5
            }]
        }))
        .unwrap();

        assert_eq!(snapshot.departments.len(), 1);
        let dept = &snapshot.departments[0];
        assert_eq!(dept.phases[&Phase::R].voltage, 220.0);
        assert_eq!(dept.phases[&Phase::S], PhaseReading::default());
        assert!(!dept.phases.contains_key(&Phase::T));
        assert_eq!(dept.total, Some(DepartmentTotal::default()));
    }

    #[test]
    fn test_phase_letters_accepted() {
        let snapshot = RealtimeSnapshot::from_value(json!({
            "departments": [{"id": "B1", "phases": {"r": {"voltage": 230}, "t": {"voltage": 229}, "x": {}}}]
        }))
        .unwrap();

        let phases = &snapshot.departments[0].phases;
        assert_eq!(phases.keys().copied().collect::<Vec<_>>(), vec![Phase::R, Phase::T]);
    }

    #[test]
    fn test_non_array_departments_rejected() {
        let err = RealtimeSnapshot::from_value(json!({"departments": {"id": "GD-A"}})).unwrap_err();
        assert_eq!(
            err,
            FetchError::Malformed("departments is an object, expected an array".to_string())
        );

        let err = RealtimeSnapshot::from_value(json!({"summary": {}})).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));

        let err = RealtimeSnapshot::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn test_bad_department_skipped() {
        let snapshot = RealtimeSnapshot::from_value(json!({
            "departments": ["oops", {"id": "GD-B"}]
        }))
        .unwrap();
        assert_eq!(snapshot.departments.len(), 1);
        assert_eq!(snapshot.departments[0].id, "GD-B");
        assert!(snapshot.departments[0].phases.is_empty());
    }

    #[test]
    fn test_attribute_round_names() {
        for phase in Phase::ALL {
            assert_eq!(Phase::from_attr(phase.as_attr()), Some(phase));
        }
        for metric in Metric::ALL {
            assert_eq!(Metric::from_attr(metric.as_attr()), Some(metric));
        }
        assert_eq!(FooterMetric::from_attr("total_cost"), Some(FooterMetric::TotalCost));
        assert_eq!(FooterMetric::from_attr("cost"), None);
    }
}
