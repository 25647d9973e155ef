// HTTP request handlers
use crate::application::chart_service::ChartService;
use crate::domain::error::StatsError;
use crate::domain::metric::{MetricKey, Resolution};
use crate::domain::series::StylePatch;
use crate::infrastructure::ndjson_stream::stream_from_receiver;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct AddSeriesRequest {
    pub entity_id: String,
    pub entity_name: String,
    pub metric: String,
}

#[derive(Deserialize)]
pub struct ReorderRequest {
    pub from: usize,
    pub to: usize,
}

#[derive(Deserialize)]
pub struct ResolutionRequest {
    pub resolution: String,
}

#[derive(Deserialize)]
pub struct ViewportRequest {
    pub start: usize,
    pub end: usize,
}

#[derive(Deserialize)]
pub struct StackingRequest {
    pub enabled: bool,
}

#[derive(Serialize)]
pub struct MetricInfo {
    pub key: MetricKey,
    pub label: &'static str,
    pub aggregation: crate::domain::metric::AggregationPolicy,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Metrics available to the series picker
pub async fn list_metrics() -> Json<Vec<MetricInfo>> {
    Json(
        MetricKey::ALL
            .iter()
            .map(|key| MetricInfo {
                key: *key,
                label: key.label(),
                aggregation: key.aggregation(),
            })
            .collect(),
    )
}

pub async fn create_chart(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let id = state.chart_service.create_chart().await;
    (StatusCode::CREATED, Json(serde_json::json!({ "id": id })))
}

pub async fn get_chart(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatsError> {
    Ok(Json(state.chart_service.view(&id).await?).into_response())
}

pub async fn delete_chart(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, StatsError> {
    state.chart_service.delete_chart(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_series(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddSeriesRequest>,
) -> Result<Response, StatsError> {
    let metric: MetricKey = body.metric.parse()?;
    let descriptor = state
        .chart_service
        .add_series(&id, &body.entity_id, &body.entity_name, metric)
        .await?;
    spawn_load(state.chart_service.clone(), id);
    Ok(Json(descriptor).into_response())
}

pub async fn remove_series(
    Path((id, series_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, StatsError> {
    state.chart_service.remove_series(&id, &series_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_visibility(
    Path((id, series_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatsError> {
    let descriptor = state
        .chart_service
        .toggle_visibility(&id, &series_id)
        .await?;
    if descriptor.visible {
        spawn_load(state.chart_service.clone(), id);
    }
    Ok(Json(descriptor).into_response())
}

pub async fn update_style(
    Path((id, series_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Json(patch): Json<StylePatch>,
) -> Result<Response, StatsError> {
    let descriptor = state
        .chart_service
        .update_style(&id, &series_id, patch)
        .await?;
    Ok(Json(descriptor).into_response())
}

pub async fn retry_series(
    Path((id, series_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, StatsError> {
    state.chart_service.retry(&id, &series_id).await?;
    spawn_load(state.chart_service.clone(), id);
    Ok(StatusCode::ACCEPTED)
}

pub async fn reorder(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<ReorderRequest>,
) -> Result<Response, StatsError> {
    let series = state.chart_service.reorder(&id, body.from, body.to).await?;
    Ok(Json(series).into_response())
}

pub async fn set_resolution(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<ResolutionRequest>,
) -> Result<Response, StatsError> {
    let resolution: Resolution = body.resolution.parse()?;
    let spec = state.chart_service.set_resolution(&id, resolution).await?;
    Ok(Json(spec).into_response())
}

pub async fn set_viewport(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<ViewportRequest>,
) -> Result<Response, StatsError> {
    let spec = state
        .chart_service
        .set_viewport(&id, body.start, body.end)
        .await?;
    Ok(Json(spec).into_response())
}

pub async fn set_stacking(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<StackingRequest>,
) -> Result<Response, StatsError> {
    let spec = state.chart_service.set_stacking(&id, body.enabled).await?;
    Ok(Json(spec).into_response())
}

/// Stream load progress for a chart (progressive loading)
pub async fn stream_load(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatsError> {
    let rx = state.chart_service.stream_load(&id).await?;
    Ok(stream_from_receiver(rx).into_response())
}

fn spawn_load(service: ChartService, chart_id: String) {
    tokio::spawn(async move {
        match service.load_missing(&chart_id).await {
            Ok(summary) if summary.loaded + summary.failed > 0 => {
                tracing::info!(
                    "Chart {}: loaded {} series, {} failed in {}ms",
                    chart_id,
                    summary.loaded,
                    summary.failed,
                    summary.duration_ms
                );
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Background load for {} skipped: {}", chart_id, e),
        }
    });
}
