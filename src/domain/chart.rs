// Chart table and render description domain models
use serde::Serialize;
use std::collections::BTreeMap;

use super::metric::Resolution;
use super::series::ChartStyle;

/// One bucket of the merged table. Series without data at this bucket have no entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub date: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl TableRow {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, series_id: &str) -> Option<f64> {
        self.values.get(series_id).copied()
    }
}

pub type ResampledTable = Vec<TableRow>;

/// Inclusive index range into a `ResampledTable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewportRange {
    pub start_index: usize,
    pub end_index: usize,
}

impl ViewportRange {
    pub fn new(start_index: usize, end_index: usize) -> Self {
        Self {
            start_index,
            end_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSeries {
    pub series_id: String,
    pub label: String,
    pub kind: ChartStyle,
    pub data_key: String,
    pub axis_id: &'static str,
    pub color: String,
    pub z_order: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub resolution: Resolution,
    pub viewport: Option<ViewportRange>,
    pub total_rows: usize,
    pub series: Vec<PlotSeries>,
    pub rows: Vec<TableRow>,
}
