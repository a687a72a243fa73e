//! JavaScript interop for Chart.js visualization.
//! Provides Rust bindings to chart helper functions defined in chart_helpers.js.
//! Only labels and values cross the boundary; styling lives on the JS side.

use log::warn;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/chart_helpers.js")]
extern "C" {
    #[wasm_bindgen(js_name = renderBarChart)]
    fn render_bar_chart_js(canvas_id: &str, labels: JsValue, values: JsValue, series_label: &str);

    #[wasm_bindgen(js_name = renderPieChart)]
    fn render_pie_chart_js(canvas_id: &str, labels: JsValue, values: JsValue);

    #[wasm_bindgen(js_name = destroyChart)]
    pub fn destroy_chart(canvas_id: &str);
}

/// Labels and values of one chart series, in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl Series {
    pub fn from_pairs<L: Into<String>>(pairs: impl IntoIterator<Item = (L, f64)>) -> Self {
        let (labels, values) = pairs.into_iter().map(|(l, v)| (l.into(), v)).unzip();
        Self { labels, values }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn to_js(&self) -> Option<(JsValue, JsValue)> {
        let labels = serde_wasm_bindgen::to_value(&self.labels);
        let values = serde_wasm_bindgen::to_value(&self.values);
        match (labels, values) {
            (Ok(l), Ok(v)) => Some((l, v)),
            (Err(e), _) | (_, Err(e)) => {
                warn!("Failed to convert chart series: {}", e);
                None
            }
        }
    }
}

/// Draw (or redraw) a bar chart on the canvas with id `canvas_id`.
pub fn render_bar_chart(canvas_id: &str, series: &Series, series_label: &str) {
    if series.is_empty() {
        destroy_chart(canvas_id);
        return;
    }
    if let Some((labels, values)) = series.to_js() {
        render_bar_chart_js(canvas_id, labels, values, series_label);
    }
}

pub fn render_pie_chart(canvas_id: &str, series: &Series) {
    if series.is_empty() {
        destroy_chart(canvas_id);
        return;
    }
    if let Some((labels, values)) = series.to_js() {
        render_pie_chart_js(canvas_id, labels, values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_keeps_pair_order() {
        let s = Series::from_pairs(vec![("CSE".to_string(), 7.5), ("ECE".to_string(), 5.0)]);
        assert_eq!(s.labels, vec!["CSE", "ECE"]);
        assert_eq!(s.values, vec![7.5, 5.0]);
        assert!(Series::from_pairs(Vec::<(&str, f64)>::new()).is_empty());
    }
}
