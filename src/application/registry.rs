// Ordered registry of user-configured chart series
use crate::domain::error::StatsError;
use crate::domain::metric::MetricKey;
use crate::domain::series::{series_id, ChartStyle, SeriesDescriptor, StylePatch, YAxis};

pub const DEFAULT_PALETTE: [&str; 8] = [
    "#e84142", "#3b82f6", "#10b981", "#f59e0b", "#8b5cf6", "#ec4899", "#14b8a6", "#f97316",
];

#[derive(Debug, Clone)]
pub struct SeriesRegistry {
    series: Vec<SeriesDescriptor>,
    palette: Vec<String>,
}

impl Default for SeriesRegistry {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SeriesRegistry {
    /// An empty palette falls back to `DEFAULT_PALETTE`.
    pub fn new(palette: Vec<String>) -> Self {
        let palette = if palette.is_empty() {
            DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
        } else {
            palette
        };
        Self {
            series: Vec::new(),
            palette,
        }
    }

    pub fn series(&self) -> &[SeriesDescriptor] {
        &self.series
    }

    pub fn get(&self, id: &str) -> Option<&SeriesDescriptor> {
        self.series.iter().find(|s| s.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut SeriesDescriptor, StatsError> {
        self.series
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StatsError::SeriesNotFound(id.to_string()))
    }

    /// Adds a series, or toggles the visibility of the one already bound to
    /// the same entity and metric.
    pub fn add_series(
        &mut self,
        entity_id: &str,
        entity_name: &str,
        metric: MetricKey,
    ) -> SeriesDescriptor {
        let id = series_id(entity_id, metric);
        if let Some(existing) = self.series.iter_mut().find(|s| s.id == id) {
            existing.visible = !existing.visible;
            return existing.clone();
        }

        let len = self.series.len();
        let color = self.palette[len % self.palette.len()].clone();
        let y_axis = self
            .series
            .iter()
            .find(|s| s.metric == metric)
            .map(|s| s.y_axis)
            .unwrap_or(if len % 2 == 0 { YAxis::Left } else { YAxis::Right });
        let z_order = self.series.iter().map(|s| s.z_order).max().unwrap_or(0) + 1;

        let descriptor = SeriesDescriptor {
            id,
            entity_id: entity_id.to_string(),
            entity_name: entity_name.to_string(),
            metric,
            color,
            y_axis,
            chart_style: ChartStyle::Line,
            visible: true,
            stack_group: None,
            z_order,
        };
        self.series.push(descriptor.clone());
        descriptor
    }

    pub fn remove_series(&mut self, id: &str) -> Result<SeriesDescriptor, StatsError> {
        let idx = self
            .series
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StatsError::SeriesNotFound(id.to_string()))?;
        let removed = self.series.remove(idx);
        self.renumber();
        Ok(removed)
    }

    pub fn toggle_visibility(&mut self, id: &str) -> Result<SeriesDescriptor, StatsError> {
        let series = self.get_mut(id)?;
        series.visible = !series.visible;
        Ok(series.clone())
    }

    pub fn update_style(
        &mut self,
        id: &str,
        patch: StylePatch,
    ) -> Result<SeriesDescriptor, StatsError> {
        let series = self.get_mut(id)?;
        series.apply(patch);
        Ok(series.clone())
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), StatsError> {
        let len = self.series.len();
        for index in [from, to] {
            if index >= len {
                return Err(StatsError::IndexOutOfBounds { index, len });
            }
        }
        let moved = self.series.remove(from);
        self.series.insert(to, moved);
        self.renumber();
        Ok(())
    }

    // z_order mirrors list position, 1-indexed
    fn renumber(&mut self) {
        for (idx, series) in self.series.iter_mut().enumerate() {
            series.z_order = idx as u32 + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn z_orders(registry: &SeriesRegistry) -> Vec<u32> {
        let mut z: Vec<u32> = registry.series().iter().map(|s| s.z_order).collect();
        z.sort();
        z
    }

    fn populated() -> SeriesRegistry {
        let mut registry = SeriesRegistry::default();
        registry.add_series("a", "Chain A", MetricKey::TxCount);
        registry.add_series("b", "Chain B", MetricKey::ActiveAddresses);
        registry.add_series("c", "Chain C", MetricKey::GasUsed);
        registry.add_series("d", "Chain D", MetricKey::FeesPaid);
        registry
    }

    #[test]
    fn test_add_same_pair_toggles_instead_of_duplicating() {
        let mut registry = SeriesRegistry::default();
        let first = registry.add_series("chain1", "Chain 1", MetricKey::TxCount);
        assert!(first.visible);
        let second = registry.add_series("chain1", "Chain 1", MetricKey::TxCount);
        assert!(!second.visible);
        assert_eq!(registry.series().len(), 1);
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_default_colors_cycle_palette() {
        let mut registry = SeriesRegistry::default();
        let colors: Vec<String> = (0..9)
            .map(|i| {
                registry
                    .add_series(&format!("chain{i}"), "x", MetricKey::TxCount)
                    .color
            })
            .collect();
        assert_eq!(colors[0], DEFAULT_PALETTE[0]);
        assert_eq!(colors[7], DEFAULT_PALETTE[7]);
        assert_eq!(colors[8], DEFAULT_PALETTE[0]);
    }

    #[test]
    fn test_default_axis_follows_metric_then_parity() {
        let mut registry = SeriesRegistry::default();
        let a = registry.add_series("a", "A", MetricKey::TxCount);
        let b = registry.add_series("b", "B", MetricKey::GasUsed);
        let c = registry.add_series("c", "C", MetricKey::GasUsed);
        let d = registry.add_series("d", "D", MetricKey::TxCount);
        assert_eq!(a.y_axis, YAxis::Left);
        assert_eq!(b.y_axis, YAxis::Right);
        // same metric as b, even though len is even
        assert_eq!(c.y_axis, YAxis::Right);
        assert_eq!(d.y_axis, YAxis::Left);
    }

    #[test]
    fn test_new_series_defaults() {
        let mut registry = SeriesRegistry::default();
        let a = registry.add_series("a", "A", MetricKey::TxCount);
        assert_eq!(a.chart_style, ChartStyle::Line);
        assert_eq!(a.z_order, 1);
        assert_eq!(a.stack_group, None);
        let b = registry.add_series("b", "B", MetricKey::TxCount);
        assert_eq!(b.z_order, 2);
    }

    #[test]
    fn test_reorder_keeps_z_order_a_permutation() {
        let mut registry = populated();
        registry.reorder(0, 3).unwrap();
        assert_eq!(z_orders(&registry), vec![1, 2, 3, 4]);
        let ids: Vec<&str> = registry.series().iter().map(|s| s.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "d", "a"]);
        assert_eq!(registry.get("a-txCount").unwrap().z_order, 4);

        registry.reorder(2, 0).unwrap();
        assert_eq!(z_orders(&registry), vec![1, 2, 3, 4]);
        assert_eq!(registry.series()[0].entity_id, "d");
        assert_eq!(registry.series()[0].z_order, 1);
    }

    #[test]
    fn test_reorder_rejects_out_of_range() {
        let mut registry = populated();
        assert_eq!(
            registry.reorder(0, 4),
            Err(StatsError::IndexOutOfBounds { index: 4, len: 4 })
        );
    }

    #[test]
    fn test_remove_renumbers() {
        let mut registry = populated();
        registry.remove_series("b-activeAddresses").unwrap();
        assert_eq!(z_orders(&registry), vec![1, 2, 3]);
        let e = registry.add_series("e", "E", MetricKey::TxCount);
        assert_eq!(e.z_order, 4);
        assert!(registry.remove_series("missing").is_err());
    }

    #[test]
    fn test_toggle_and_update_style() {
        let mut registry = populated();
        let d = registry.toggle_visibility("a-txCount").unwrap();
        assert!(!d.visible);
        let patch = StylePatch {
            color: Some("#000000".to_string()),
            chart_style: Some(ChartStyle::Bar),
            ..Default::default()
        };
        let d = registry.update_style("a-txCount", patch).unwrap();
        assert_eq!(d.color, "#000000");
        assert_eq!(d.chart_style, ChartStyle::Bar);
        assert_eq!(d.z_order, 1);
        assert!(matches!(
            registry.toggle_visibility("nope"),
            Err(StatsError::SeriesNotFound(_))
        ));
    }

    #[test]
    fn test_custom_palette() {
        let mut registry = SeriesRegistry::new(vec!["red".to_string()]);
        assert_eq!(registry.add_series("a", "A", MetricKey::TxCount).color, "red");
        assert_eq!(registry.add_series("b", "B", MetricKey::TxCount).color, "red");
    }
}
