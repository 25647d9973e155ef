// Chart service - Session store and progressive series loading
use crate::application::chart_session::{ChartSession, FetchOutcome, SeriesLoadState};
use crate::application::metric_source::MetricSource;
use crate::domain::chart::ChartSpec;
use crate::domain::error::StatsError;
use crate::domain::metric::{MetricKey, Resolution};
use crate::domain::series::{SeriesDescriptor, StylePatch};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::{RwLock, mpsc};

/// Progress of one load pass, in the order events happen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoadEvent {
    Started {
        pending: Vec<String>,
    },
    SeriesLoaded {
        series_id: String,
        points: usize,
    },
    SeriesFailed {
        series_id: String,
        error: String,
    },
    SeriesDiscarded {
        series_id: String,
    },
    Complete {
        loaded: usize,
        failed: usize,
        duration_ms: u64,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadSummary {
    pub loaded: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

/// Everything a client needs to draw one chart and its legend.
#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    pub id: String,
    #[serde(flatten)]
    pub spec: ChartSpec,
    pub legend: Vec<SeriesDescriptor>,
    pub load_states: BTreeMap<String, SeriesLoadState>,
}

#[derive(Clone)]
pub struct ChartService {
    source: Arc<dyn MetricSource>,
    sessions: Arc<RwLock<HashMap<String, ChartSession>>>,
    next_id: Arc<AtomicU64>,
    palette: Vec<String>,
}

impl ChartService {
    pub fn new(source: Arc<dyn MetricSource>, palette: Vec<String>) -> Self {
        Self {
            source,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            palette,
        }
    }

    pub async fn create_chart(&self) -> String {
        let id = format!("chart-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        self.sessions
            .write()
            .await
            .insert(id.clone(), ChartSession::new(self.palette.clone()));
        tracing::debug!("Created chart {}", id);
        id
    }

    pub async fn delete_chart(&self, chart_id: &str) -> Result<(), StatsError> {
        self.sessions
            .write()
            .await
            .remove(chart_id)
            .map(|_| ())
            .ok_or_else(|| StatsError::ChartNotFound(chart_id.to_string()))
    }

    async fn with_session<T>(
        &self,
        chart_id: &str,
        f: impl FnOnce(&mut ChartSession) -> Result<T, StatsError>,
    ) -> Result<T, StatsError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(chart_id)
            .ok_or_else(|| StatsError::ChartNotFound(chart_id.to_string()))?;
        f(session)
    }

    pub async fn view(&self, chart_id: &str) -> Result<ChartView, StatsError> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(chart_id)
            .ok_or_else(|| StatsError::ChartNotFound(chart_id.to_string()))?;
        Ok(ChartView {
            id: chart_id.to_string(),
            spec: session.chart_spec(),
            legend: session.series().to_vec(),
            load_states: session.load_states(),
        })
    }

    pub async fn add_series(
        &self,
        chart_id: &str,
        entity_id: &str,
        entity_name: &str,
        metric: MetricKey,
    ) -> Result<SeriesDescriptor, StatsError> {
        self.with_session(chart_id, |s| Ok(s.add_series(entity_id, entity_name, metric)))
            .await
    }

    pub async fn remove_series(
        &self,
        chart_id: &str,
        series_id: &str,
    ) -> Result<SeriesDescriptor, StatsError> {
        self.with_session(chart_id, |s| s.remove_series(series_id))
            .await
    }

    pub async fn toggle_visibility(
        &self,
        chart_id: &str,
        series_id: &str,
    ) -> Result<SeriesDescriptor, StatsError> {
        self.with_session(chart_id, |s| s.toggle_visibility(series_id))
            .await
    }

    pub async fn update_style(
        &self,
        chart_id: &str,
        series_id: &str,
        patch: StylePatch,
    ) -> Result<SeriesDescriptor, StatsError> {
        self.with_session(chart_id, |s| s.update_style(series_id, patch))
            .await
    }

    pub async fn reorder(
        &self,
        chart_id: &str,
        from: usize,
        to: usize,
    ) -> Result<Vec<SeriesDescriptor>, StatsError> {
        self.with_session(chart_id, |s| {
            s.reorder(from, to)?;
            Ok(s.series().to_vec())
        })
        .await
    }

    pub async fn set_resolution(
        &self,
        chart_id: &str,
        resolution: Resolution,
    ) -> Result<ChartSpec, StatsError> {
        self.with_session(chart_id, |s| {
            s.set_resolution(resolution);
            Ok(s.chart_spec())
        })
        .await
    }

    pub async fn set_viewport(
        &self,
        chart_id: &str,
        start: usize,
        end: usize,
    ) -> Result<ChartSpec, StatsError> {
        self.with_session(chart_id, |s| {
            s.set_viewport(start, end)?;
            Ok(s.chart_spec())
        })
        .await
    }

    pub async fn set_stacking(&self, chart_id: &str, enabled: bool) -> Result<ChartSpec, StatsError> {
        self.with_session(chart_id, |s| {
            s.set_stacking(enabled);
            Ok(s.chart_spec())
        })
        .await
    }

    pub async fn retry(&self, chart_id: &str, series_id: &str) -> Result<(), StatsError> {
        self.with_session(chart_id, |s| s.retry(series_id)).await
    }

    /// Fetch every pending series of a chart concurrently, reporting progress
    /// as results settle. The session lock is never held across a fetch.
    pub async fn stream_load(
        &self,
        chart_id: &str,
    ) -> Result<mpsc::Receiver<LoadEvent>, StatsError> {
        let pending = self
            .with_session(chart_id, |s| Ok(s.pending_fetches()))
            .await?;
        let (tx, rx) = mpsc::channel(100);
        let start_time = Instant::now();

        tracing::debug!("Loading {} series for chart {}", pending.len(), chart_id);

        let service = self.clone();
        let chart_id = chart_id.to_string();
        tokio::spawn(async move {
            let started = LoadEvent::Started {
                pending: pending.iter().map(|p| p.series_id.clone()).collect(),
            };
            let _ = tx.send(started).await;

            let mut in_flight: FuturesUnordered<_> = pending
                .into_iter()
                .map(|fetch| {
                    let source = service.source.clone();
                    async move {
                        let result = source.fetch_series(&fetch.entity_id, fetch.metric).await;
                        (fetch, result)
                    }
                })
                .collect();

            let mut loaded = 0;
            let mut failed = 0;
            while let Some((fetch, result)) = in_flight.next().await {
                let points = result.as_ref().map(|p| p.len()).unwrap_or(0);
                let error = result.as_ref().err().map(|e| e.to_string());

                let outcome = {
                    let mut sessions = service.sessions.write().await;
                    match sessions.get_mut(&chart_id) {
                        Some(session) => session.complete_fetch(&fetch, result),
                        None => FetchOutcome::Discarded,
                    }
                };
                let series_id = fetch.series_id;

                let event = match outcome {
                    FetchOutcome::Cached => {
                        loaded += 1;
                        LoadEvent::SeriesLoaded { series_id, points }
                    }
                    FetchOutcome::Failed => {
                        failed += 1;
                        LoadEvent::SeriesFailed {
                            series_id,
                            error: error.unwrap_or_default(),
                        }
                    }
                    FetchOutcome::Discarded => LoadEvent::SeriesDiscarded { series_id },
                };
                let _ = tx.send(event).await;
            }

            let complete = LoadEvent::Complete {
                loaded,
                failed,
                duration_ms: start_time.elapsed().as_millis() as u64,
            };
            let _ = tx.send(complete).await;
        });

        Ok(rx)
    }

    pub async fn load_missing(&self, chart_id: &str) -> Result<LoadSummary, StatsError> {
        let mut rx = self.stream_load(chart_id).await?;
        let mut summary = LoadSummary::default();
        while let Some(event) = rx.recv().await {
            if let LoadEvent::Complete {
                loaded,
                failed,
                duration_ms,
            } = event
            {
                summary = LoadSummary {
                    loaded,
                    failed,
                    duration_ms,
                };
            }
        }
        Ok(summary)
    }
}
