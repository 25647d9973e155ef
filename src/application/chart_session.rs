// Per-chart state and the derivation pipeline
use crate::application::merge::merge;
use crate::application::registry::SeriesRegistry;
use crate::application::render::to_chart_spec;
use crate::application::resampler::resample;
use crate::application::viewport::ViewportController;
use crate::domain::chart::{ChartSpec, ResampledTable, ViewportRange};
use crate::domain::error::{SourceError, StatsError};
use crate::domain::metric::{MetricKey, MetricPoint, Resolution};
use crate::domain::series::{SeriesDescriptor, StylePatch};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "lowercase")]
pub enum SeriesLoadState {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// A fetch the caller must perform and report back via `complete_fetch`.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFetch {
    pub series_id: String,
    pub entity_id: String,
    pub metric: MetricKey,
    /// Distinguishes this fetch from one issued for an earlier descriptor
    /// with the same id.
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Cached,
    Failed,
    /// The series was removed (or removed and re-added) while its fetch was
    /// in flight.
    Discarded,
}

#[derive(Debug, Default)]
pub struct ChartSession {
    registry: SeriesRegistry,
    cache: HashMap<String, Vec<MetricPoint>>,
    load_states: HashMap<String, SeriesLoadState>,
    in_flight: HashMap<String, u64>,
    next_generation: u64,
    resolution: Resolution,
    stack_same_metrics: bool,
    viewport: ViewportController,
    table: ResampledTable,
}

impl ChartSession {
    pub fn new(palette: Vec<String>) -> Self {
        Self {
            registry: SeriesRegistry::new(palette),
            ..Default::default()
        }
    }

    pub fn series(&self) -> &[SeriesDescriptor] {
        self.registry.series()
    }

    pub fn table(&self) -> &ResampledTable {
        &self.table
    }

    pub fn load_state(&self, id: &str) -> SeriesLoadState {
        self.load_states
            .get(id)
            .cloned()
            .unwrap_or(SeriesLoadState::Idle)
    }

    /// Load state of every registered series, for legend indicators.
    pub fn load_states(&self) -> BTreeMap<String, SeriesLoadState> {
        self.registry
            .series()
            .iter()
            .map(|d| (d.id.clone(), self.load_state(&d.id)))
            .collect()
    }

    fn clear_failed(&mut self, id: &str) {
        if matches!(self.load_states.get(id), Some(SeriesLoadState::Failed(_))) {
            self.load_states.remove(id);
        }
    }

    pub fn add_series(
        &mut self,
        entity_id: &str,
        entity_name: &str,
        metric: MetricKey,
    ) -> SeriesDescriptor {
        let descriptor = self.registry.add_series(entity_id, entity_name, metric);
        // showing a failed series again is the user's retry
        if descriptor.visible {
            self.clear_failed(&descriptor.id);
        }
        self.recompute();
        descriptor
    }

    pub fn remove_series(&mut self, id: &str) -> Result<SeriesDescriptor, StatsError> {
        let removed = self.registry.remove_series(id)?;
        self.cache.remove(id);
        self.load_states.remove(id);
        self.in_flight.remove(id);
        self.recompute();
        Ok(removed)
    }

    pub fn toggle_visibility(&mut self, id: &str) -> Result<SeriesDescriptor, StatsError> {
        let descriptor = self.registry.toggle_visibility(id)?;
        if descriptor.visible {
            self.clear_failed(id);
        }
        self.recompute();
        Ok(descriptor)
    }

    pub fn update_style(
        &mut self,
        id: &str,
        patch: StylePatch,
    ) -> Result<SeriesDescriptor, StatsError> {
        self.registry.update_style(id, patch)
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), StatsError> {
        self.registry.reorder(from, to)
    }

    pub fn set_resolution(&mut self, resolution: Resolution) {
        self.resolution = resolution;
        self.recompute();
    }

    pub fn set_stacking(&mut self, enabled: bool) {
        self.stack_same_metrics = enabled;
    }

    pub fn set_viewport(&mut self, start: usize, end: usize) -> Result<ViewportRange, StatsError> {
        self.viewport.set_range(start, end)
    }

    pub fn retry(&mut self, id: &str) -> Result<(), StatsError> {
        if self.registry.get(id).is_none() {
            return Err(StatsError::SeriesNotFound(id.to_string()));
        }
        self.clear_failed(id);
        Ok(())
    }

    /// Visible series with nothing cached and no fetch in flight or failed.
    /// Each returned series is marked loading.
    pub fn pending_fetches(&mut self) -> Vec<PendingFetch> {
        let mut pending = Vec::new();
        for descriptor in self.registry.series() {
            if !descriptor.visible || self.cache.contains_key(&descriptor.id) {
                continue;
            }
            if self.load_states.contains_key(&descriptor.id) {
                continue;
            }
            self.next_generation += 1;
            pending.push(PendingFetch {
                series_id: descriptor.id.clone(),
                entity_id: descriptor.entity_id.clone(),
                metric: descriptor.metric,
                generation: self.next_generation,
            });
        }
        for fetch in &pending {
            self.load_states
                .insert(fetch.series_id.clone(), SeriesLoadState::Loading);
            self.in_flight
                .insert(fetch.series_id.clone(), fetch.generation);
        }
        pending
    }

    pub fn complete_fetch(
        &mut self,
        fetch: &PendingFetch,
        result: Result<Vec<MetricPoint>, SourceError>,
    ) -> FetchOutcome {
        let id = fetch.series_id.as_str();
        if self.in_flight.get(id) != Some(&fetch.generation) || self.registry.get(id).is_none() {
            tracing::debug!("Dropping stale fetch result for series {}", id);
            return FetchOutcome::Discarded;
        }
        self.in_flight.remove(id);

        match result {
            Ok(points) => {
                tracing::debug!("Cached {} points for series {}", points.len(), id);
                self.cache.insert(id.to_string(), points);
                self.load_states.insert(id.to_string(), SeriesLoadState::Ready);
                self.recompute();
                FetchOutcome::Cached
            }
            Err(e) => {
                tracing::warn!("Fetch failed for series {}: {}", id, e);
                self.load_states
                    .insert(id.to_string(), SeriesLoadState::Failed(e.to_string()));
                FetchOutcome::Failed
            }
        }
    }

    /// Re-derive the merged table from cache, registry and resolution.
    pub fn recompute(&mut self) {
        let mut resampled: BTreeMap<String, Vec<MetricPoint>> = BTreeMap::new();
        for descriptor in self.registry.series().iter().filter(|d| d.visible) {
            if let Some(points) = self.cache.get(&descriptor.id) {
                resampled.insert(
                    descriptor.id.clone(),
                    resample(points, self.resolution, descriptor.metric.aggregation()),
                );
            }
        }

        self.table = merge(&resampled);
        self.viewport.sync(self.table.len(), self.resolution);
    }

    pub fn chart_spec(&self) -> ChartSpec {
        to_chart_spec(
            self.registry.series(),
            &self.table,
            self.viewport.range(),
            self.resolution,
            self.stack_same_metrics,
        )
    }
}
