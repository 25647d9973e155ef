// Series descriptor domain model
use serde::{Deserialize, Deserializer, Serialize};

use super::metric::MetricKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YAxis {
    Left,
    Right,
}

impl YAxis {
    pub fn axis_id(&self) -> &'static str {
        match self {
            YAxis::Left => "left",
            YAxis::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyle {
    #[default]
    Line,
    Bar,
    Area,
}

/// One plotted line, bar or area bound to an (entity, metric) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDescriptor {
    pub id: String,
    pub entity_id: String,
    pub entity_name: String,
    pub metric: MetricKey,
    pub color: String,
    pub y_axis: YAxis,
    pub chart_style: ChartStyle,
    pub visible: bool,
    pub stack_group: Option<String>,
    pub z_order: u32,
}

/// Composite key, stable for the same entity and metric.
pub fn series_id(entity_id: &str, metric: MetricKey) -> String {
    format!("{}-{}", entity_id, metric.as_str())
}

/// Partial update of a descriptor's display properties.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StylePatch {
    pub color: Option<String>,
    pub y_axis: Option<YAxis>,
    pub chart_style: Option<ChartStyle>,
    /// Absent leaves the group alone, `null` clears it.
    #[serde(default, deserialize_with = "present")]
    pub stack_group: Option<Option<String>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl SeriesDescriptor {
    pub fn apply(&mut self, patch: StylePatch) {
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(y_axis) = patch.y_axis {
            self.y_axis = y_axis;
        }
        if let Some(chart_style) = patch.chart_style {
            self.chart_style = chart_style;
        }
        if let Some(stack_group) = patch.stack_group {
            self.stack_group = stack_group;
        }
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.entity_name, self.metric.label())
    }
}
