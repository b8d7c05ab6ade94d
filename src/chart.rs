//! Chart adapters
//!
//! Reshape hourly and pie payloads into Chart.js dataset objects. The line
//! chart is created once and mutated in place; the doughnut is destroyed
//! and recreated on every refresh so no stale slices survive.

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::model::{ChartUnit, HourlyPayload, PieData, ROOMS};

/// Colour per room index
pub const ROOM_COLORS: [&str; 4] = ["#ef4444", "#f59e0b", "#10b981", "#0ea5e9"];

/// One line of the hourly chart in Chart.js dataset shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDataset {
    pub label: String,
    pub data: Vec<Option<f64>>,
    pub border_color: &'static str,
    pub background_color: &'static str,
    pub fill: bool,
    pub tension: f64,
    pub border_width: u32,
}

impl LineDataset {
    fn for_room(index: usize, data: Vec<Option<f64>>) -> Self {
        let color = ROOM_COLORS[index % ROOM_COLORS.len()];
        Self {
            label: format!("Ruang {}", index + 1),
            data,
            border_color: color,
            background_color: color,
            fill: false,
            tension: 0.4,
            border_width: 2,
        }
    }
}

/// Truncated labels and room series for one unit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitSeries {
    pub labels: Vec<String>,
    pub rooms: Vec<Vec<Option<f64>>>,
}

impl UnitSeries {
    pub fn datasets(&self) -> Vec<LineDataset> {
        self.rooms
            .iter()
            .enumerate()
            .map(|(index, points)| LineDataset::for_room(index, points.clone()))
            .collect()
    }

    /// Latest point per room, `None` for an empty series or a trailing gap
    pub fn latest(&self) -> Vec<Option<f64>> {
        self.rooms
            .iter()
            .map(|points| points.last().copied().flatten())
            .collect()
    }
}

/// Last `n` items of a slice
fn tail<T: Clone>(items: &[T], n: usize) -> Vec<T> {
    items[items.len().saturating_sub(n)..].to_vec()
}

/// In-memory copy of the last hourly fetch, per unit
#[derive(Debug, Clone)]
pub struct SeriesCache {
    history_points: usize,
    units: HashMap<ChartUnit, UnitSeries>,
}

impl SeriesCache {
    pub fn new(history_points: usize) -> Self {
        Self {
            history_points,
            units: HashMap::new(),
        }
    }

    /// Replace the cache with a payload, keeping the last points of every
    /// unit independently
    pub fn ingest(&mut self, payload: &HourlyPayload) {
        let n = self.history_points;
        let labels = tail(&payload.labels, n);

        self.units = ChartUnit::ALL
            .into_iter()
            .map(|unit| {
                let rooms = ROOMS
                    .iter()
                    .map(|room| tail(payload.series(unit, room), n))
                    .collect();
                (
                    unit,
                    UnitSeries {
                        labels: labels.clone(),
                        rooms,
                    },
                )
            })
            .collect();
    }

    pub fn get(&self, unit: ChartUnit) -> Option<&UnitSeries> {
        self.units.get(&unit)
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// A line chart that can swap its data and redraw
pub trait LineChart {
    fn redraw(&mut self, labels: &[String], datasets: &[LineDataset]);
}

/// Hourly line chart plus the unit selector state
pub struct HourlyChart<L> {
    chart: L,
    cache: SeriesCache,
    selected: ChartUnit,
}

impl<L: LineChart> HourlyChart<L> {
    pub fn new(chart: L, history_points: usize) -> Self {
        Self {
            chart,
            cache: SeriesCache::new(history_points),
            selected: ChartUnit::default(),
        }
    }

    pub fn selected(&self) -> ChartUnit {
        self.selected
    }

    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    /// Cache a fresh payload and redraw the selected unit
    pub fn apply(&mut self, payload: &HourlyPayload) -> Vec<Option<f64>> {
        self.cache.ingest(payload);
        self.redraw()
    }

    /// Switch units from the cache without fetching.
    ///
    /// Returns the latest point per room for the room widgets.
    pub fn select(&mut self, unit: ChartUnit) -> Vec<Option<f64>> {
        self.selected = unit;
        self.redraw()
    }

    fn redraw(&mut self) -> Vec<Option<f64>> {
        let Some(series) = self.cache.get(self.selected) else {
            tracing::debug!(unit = %self.selected, "No hourly data cached yet");
            return Vec::new();
        };
        self.chart.redraw(&series.labels, &series.datasets());
        series.latest()
    }
}

/// Creates and destroys doughnut chart instances
pub trait DoughnutHost {
    type Chart;

    /// Build a chart from a Chart.js config; `None` if the canvas is gone
    fn create(&mut self, config: &Value) -> Option<Self::Chart>;

    fn destroy(&mut self, chart: Self::Chart);
}

/// Room share doughnut, recreated on each refresh
pub struct PieChart<H: DoughnutHost> {
    host: H,
    instance: Option<H::Chart>,
}

impl<H: DoughnutHost> PieChart<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            instance: None,
        }
    }

    pub fn apply(&mut self, pie: &PieData) {
        self.teardown();
        self.instance = self.host.create(&doughnut_config(pie));
        if self.instance.is_none() {
            tracing::warn!("Doughnut chart could not be created");
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn is_live(&self) -> bool {
        self.instance.is_some()
    }

    /// Destroy the current instance, if any
    pub fn teardown(&mut self) {
        if let Some(chart) = self.instance.take() {
            self.host.destroy(chart);
        }
    }
}

/// Initial config for the empty hourly line chart
pub fn line_config() -> Value {
    let axis = json!({
        "ticks": {"color": "#94a3b8"},
        "grid": {"color": "#94a3b8"}
    });
    json!({
        "type": "line",
        "data": {"labels": [], "datasets": []},
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {
                "legend": {
                    "display": true,
                    "position": "bottom",
                    "labels": {
                        "color": "#ffffffff",
                        "usePointStyle": true,
                        "pointStyle": "circle",
                        "padding": 20,
                        "font": {"size": 14, "weight": "bold"}
                    }
                }
            },
            "scales": {"x": axis, "y": axis}
        }
    })
}

/// Config for a freshly created room share doughnut
pub fn doughnut_config(pie: &PieData) -> Value {
    json!({
        "type": "doughnut",
        "data": {
            "labels": pie.labels,
            "datasets": [{
                "data": pie.values,
                "backgroundColor": ROOM_COLORS,
            }]
        },
        "options": {
            "responsive": true,
            "plugins": {"legend": {"display": false}}
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct FakeLine {
        draws: Rc<RefCell<Vec<(Vec<String>, Vec<LineDataset>)>>>,
    }

    impl LineChart for FakeLine {
        fn redraw(&mut self, labels: &[String], datasets: &[LineDataset]) {
            self.draws
                .borrow_mut()
                .push((labels.to_vec(), datasets.to_vec()));
        }
    }

    #[derive(Default)]
    struct FakeHost {
        next_id: u32,
        live: Vec<u32>,
        configs: Vec<Value>,
    }

    impl DoughnutHost for FakeHost {
        type Chart = u32;

        fn create(&mut self, config: &Value) -> Option<u32> {
            self.next_id += 1;
            self.live.push(self.next_id);
            self.configs.push(config.clone());
            Some(self.next_id)
        }

        fn destroy(&mut self, chart: u32) {
            self.live.retain(|id| *id != chart);
        }
    }

    fn long_payload(points: usize) -> HourlyPayload {
        let labels = (0..points).map(|i| format!("{:02}:{:02}", i / 60, i % 60)).collect();
        let series = |offset: f64| -> Vec<Option<f64>> {
            (0..points).map(|i| Some(i as f64 + offset)).collect()
        };
        HourlyPayload::new(labels)
            .with_series(ChartUnit::Energy, "Ruang 1", series(0.0))
            .with_series(ChartUnit::Energy, "Ruang 2", (0..10).map(|i| Some(i as f64)).collect())
            .with_series(ChartUnit::Voltage, "Ruang 1", series(200.0))
            .with_series(ChartUnit::Frequency, "Ruang 4", series(50.0))
    }

    #[test]
    fn test_every_unit_truncated_independently() {
        let mut cache = SeriesCache::new(30);
        cache.ingest(&long_payload(45));

        for unit in ChartUnit::ALL {
            let series = cache.get(unit).unwrap();
            assert_eq!(series.labels.len(), 30);
            assert_eq!(series.labels[0], "00:15");
            assert_eq!(series.rooms.len(), 4);
            assert!(series.rooms.iter().all(|room| room.len() <= 30));
        }

        let energy = cache.get(ChartUnit::Energy).unwrap();
        assert_eq!(energy.rooms[0].first(), Some(&Some(15.0)));
        assert_eq!(energy.rooms[0].last(), Some(&Some(44.0)));
        assert_eq!(energy.rooms[1].len(), 10);
        assert!(energy.rooms[2].is_empty());

        let voltage = cache.get(ChartUnit::Voltage).unwrap();
        assert_eq!(voltage.rooms[0].first(), Some(&Some(215.0)));

        let hz = cache.get(ChartUnit::Frequency).unwrap();
        assert_eq!(hz.rooms[3].len(), 30);
    }

    #[test]
    fn test_short_series_untouched() {
        let mut cache = SeriesCache::new(30);
        cache.ingest(&long_payload(5));
        let energy = cache.get(ChartUnit::Energy).unwrap();
        assert_eq!(energy.labels.len(), 5);
        assert_eq!(energy.rooms[0].len(), 5);
    }

    #[test]
    fn test_datasets_one_per_room_with_fixed_colors() {
        let series = UnitSeries {
            labels: vec!["10:00".to_string()],
            rooms: vec![vec![Some(1.0)], vec![], vec![None], vec![Some(4.0)]],
        };
        let datasets = series.datasets();
        assert_eq!(datasets.len(), 4);
        assert_eq!(datasets[0].label, "Ruang 1");
        assert_eq!(datasets[3].label, "Ruang 4");
        assert_eq!(datasets[2].border_color, "#10b981");
        assert_eq!(series.latest(), vec![Some(1.0), None, None, Some(4.0)]);

        let js = serde_json::to_value(&datasets[0]).unwrap();
        assert_eq!(js["borderColor"], "#ef4444");
        assert_eq!(js["borderWidth"], 2);
        assert_eq!(js["tension"], 0.4);
    }

    #[test]
    fn test_unit_switch_uses_cache_only() {
        let line = FakeLine::default();
        let mut chart = HourlyChart::new(line.clone(), 30);

        let latest = chart.apply(&long_payload(40));
        assert_eq!(latest[0], Some(39.0));
        assert_eq!(line.draws.borrow().len(), 1);

        let latest = chart.select(ChartUnit::Voltage);
        assert_eq!(chart.selected(), ChartUnit::Voltage);
        assert_eq!(latest[0], Some(239.0));

        let draws = line.draws.borrow();
        assert_eq!(draws.len(), 2);
        let (labels, datasets) = &draws[1];
        assert_eq!(labels.len(), 30);
        assert_eq!(datasets[0].data.first(), Some(&Some(210.0)));
    }

    #[test]
    fn test_refresh_keeps_selected_unit() {
        let line = FakeLine::default();
        let mut chart = HourlyChart::new(line.clone(), 30);
        chart.select(ChartUnit::Frequency);
        assert!(line.draws.borrow().is_empty());

        chart.apply(&long_payload(3));
        let draws = line.draws.borrow();
        let (_, datasets) = draws.last().unwrap();
        assert_eq!(datasets[3].data, vec![Some(50.0), Some(51.0), Some(52.0)]);
    }

    #[test]
    fn test_pie_destroy_then_recreate() {
        let mut pie = PieChart::new(FakeHost::default());
        let data = PieData {
            labels: vec!["Ruang 1".to_string(), "Ruang 2".to_string()],
            values: vec![12.5, 7.5],
        };

        pie.apply(&data);
        pie.apply(&data);
        pie.apply(&data);
        assert_eq!(pie.host.live, vec![3]);
        assert!(pie.is_live());

        let config = &pie.host.configs[2];
        assert_eq!(config["type"], "doughnut");
        assert_eq!(config["data"]["datasets"][0]["data"][1], 7.5);
        assert_eq!(config["options"]["plugins"]["legend"]["display"], false);

        pie.teardown();
        assert!(pie.host.live.is_empty());
        assert!(!pie.is_live());
    }

    #[test]
    fn test_line_config_shape() {
        let config = line_config();
        assert_eq!(config["type"], "line");
        assert_eq!(config["options"]["maintainAspectRatio"], false);
        assert_eq!(config["options"]["scales"]["y"]["ticks"]["color"], "#94a3b8");
    }
}
