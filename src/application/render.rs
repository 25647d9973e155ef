// Maps registry, merged table and viewport into a declarative chart description
use crate::domain::chart::{ChartSpec, PlotSeries, ResampledTable, ViewportRange};
use crate::domain::metric::Resolution;
use crate::domain::series::{ChartStyle, SeriesDescriptor};

pub fn to_chart_spec(
    descriptors: &[SeriesDescriptor],
    table: &ResampledTable,
    viewport: Option<ViewportRange>,
    resolution: Resolution,
    stack_same_metrics: bool,
) -> ChartSpec {
    let mut visible: Vec<&SeriesDescriptor> = descriptors.iter().filter(|d| d.visible).collect();
    visible.sort_by_key(|d| d.z_order);

    let series = visible
        .into_iter()
        .map(|d| PlotSeries {
            series_id: d.id.clone(),
            label: d.label(),
            kind: d.chart_style,
            data_key: d.id.clone(),
            axis_id: d.y_axis.axis_id(),
            color: d.color.clone(),
            z_order: d.z_order,
            stack_group: stack_group(d, stack_same_metrics),
        })
        .collect();

    let rows = match viewport {
        Some(range) if range.start_index < table.len() => {
            let end = range.end_index.min(table.len() - 1);
            table[range.start_index..=end].to_vec()
        }
        _ => Vec::new(),
    };

    ChartSpec {
        resolution,
        viewport,
        total_rows: table.len(),
        series,
        rows,
    }
}

fn stack_group(descriptor: &SeriesDescriptor, stack_same_metrics: bool) -> Option<String> {
    match descriptor.chart_style {
        ChartStyle::Line => None,
        ChartStyle::Bar | ChartStyle::Area if stack_same_metrics => {
            Some(descriptor.metric.as_str().to_string())
        }
        ChartStyle::Bar | ChartStyle::Area => descriptor.stack_group.clone(),
    }
}
