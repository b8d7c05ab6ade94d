//! Chart.js Adapter
//!
//! Chart.js is loaded by the page as a global `Chart`; configs and datasets
//! are built by the core as JSON and handed over through `JSON.parse`.

use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement};
use wattboard::chart::line_config;
use wattboard::{DoughnutHost, LineChart, LineDataset};

#[wasm_bindgen]
extern "C" {
    /// A live Chart.js instance
    #[wasm_bindgen(js_name = Chart)]
    pub type ChartJs;

    #[wasm_bindgen(constructor, js_class = "Chart", catch)]
    fn new(canvas: &HtmlCanvasElement, config: &JsValue) -> Result<ChartJs, JsValue>;

    #[wasm_bindgen(method, getter, js_class = "Chart")]
    fn data(this: &ChartJs) -> JsValue;

    #[wasm_bindgen(method, js_class = "Chart")]
    fn update(this: &ChartJs);

    #[wasm_bindgen(method, js_class = "Chart")]
    fn destroy(this: &ChartJs);
}

/// Serialize through JSON into a plain JS object
fn to_js<T: Serialize + ?Sized>(value: &T) -> Option<JsValue> {
    let text = serde_json::to_string(value)
        .map_err(|e| tracing::warn!(error = %e, "Chart data not serializable"))
        .ok()?;
    js_sys::JSON::parse(&text)
        .map_err(|e| tracing::warn!(error = ?e, "Chart data rejected by JSON.parse"))
        .ok()
}

fn canvas(document: &Document, id: &str) -> Option<HtmlCanvasElement> {
    let canvas = document
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<HtmlCanvasElement>().ok());
    if canvas.is_none() {
        tracing::warn!(id, "Chart canvas not found");
    }
    canvas
}

fn create(canvas: &HtmlCanvasElement, config: &Value) -> Option<ChartJs> {
    let config = to_js(config)?;
    ChartJs::new(canvas, &config)
        .map_err(|e| tracing::error!(error = ?e, "Chart.js failed to create chart"))
        .ok()
}

/// Hourly line chart, created once and updated in place
pub struct CanvasLineChart {
    chart: Option<ChartJs>,
}

impl CanvasLineChart {
    pub fn new(document: &Document, canvas_id: &str) -> Self {
        let chart = canvas(document, canvas_id).and_then(|canvas| create(&canvas, &line_config()));
        Self { chart }
    }
}

impl LineChart for CanvasLineChart {
    fn redraw(&mut self, labels: &[String], datasets: &[LineDataset]) {
        let Some(chart) = &self.chart else {
            return;
        };
        let (Some(labels), Some(datasets)) = (to_js(labels), to_js(datasets)) else {
            return;
        };

        let data = chart.data();
        let set = |key: &str, value: &JsValue| {
            if let Err(e) = js_sys::Reflect::set(&data, &JsValue::from_str(key), value) {
                tracing::warn!(key, error = ?e, "Failed to update chart data");
            }
        };
        set("labels", &labels);
        set("datasets", &datasets);
        chart.update();
    }
}

/// Creates doughnut charts on a fixed canvas
pub struct CanvasDoughnutHost {
    canvas: Option<HtmlCanvasElement>,
}

impl CanvasDoughnutHost {
    pub fn new(document: &Document, canvas_id: &str) -> Self {
        Self {
            canvas: canvas(document, canvas_id),
        }
    }
}

impl DoughnutHost for CanvasDoughnutHost {
    type Chart = ChartJs;

    fn create(&mut self, config: &Value) -> Option<ChartJs> {
        create(self.canvas.as_ref()?, config)
    }

    fn destroy(&mut self, chart: ChartJs) {
        chart.destroy();
    }
}
