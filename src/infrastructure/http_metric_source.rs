// HTTP metric source against the stats API
use crate::application::metric_source::MetricSource;
use crate::domain::error::SourceError;
use crate::domain::metric::{MetricKey, MetricPoint};
use crate::infrastructure::config::{MetricsApiSettings, prepare_path};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct HttpMetricSource {
    client: reqwest::Client,
    base_url: String,
    series_path: String,
    icm_path: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeriesEnvelope {
    data: Vec<SeriesItem>,
}

#[derive(Debug, Deserialize)]
struct SeriesItem {
    date: String,
    #[serde(default)]
    value: Option<serde_json::Value>,
    #[serde(default, rename = "messageCount")]
    message_count: Option<serde_json::Value>,
}

impl HttpMetricSource {
    pub fn new(settings: &MetricsApiSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            series_path: settings.series_path.clone(),
            icm_path: settings.icm_path.clone(),
            token: settings.token.clone(),
        }
    }

    fn build_url(&self, entity_id: &str, metric: MetricKey) -> String {
        let mut vars = HashMap::new();
        vars.insert("entity".to_string(), urlencoding::encode(entity_id).into_owned());
        vars.insert("metric".to_string(), metric.as_str().to_string());

        let template = if metric.is_message_count() {
            &self.icm_path
        } else {
            &self.series_path
        };
        format!("{}{}", self.base_url, prepare_path(template, &vars))
    }
}

#[async_trait]
impl MetricSource for HttpMetricSource {
    async fn fetch_series(
        &self,
        entity_id: &str,
        metric: MetricKey,
    ) -> Result<Vec<MetricPoint>, SourceError> {
        let url = self.build_url(entity_id, metric);
        tracing::debug!("Fetching {} for {} from {}", metric, entity_id, url);

        let mut request = self.client.get(&url).header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status { status, body });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        parse_series(&body, metric)
    }
}

/// Decode a stats envelope into an ascending series. Only a body without a
/// `data` array is rejected; items lacking a usable date or value are skipped.
pub fn parse_series(body: &[u8], metric: MetricKey) -> Result<Vec<MetricPoint>, SourceError> {
    let envelope: SeriesEnvelope =
        serde_json::from_slice(body).map_err(|e| SourceError::MalformedPayload(e.to_string()))?;

    let mut points: Vec<MetricPoint> = envelope
        .data
        .into_iter()
        .filter_map(|item| {
            let raw = if metric.is_message_count() {
                item.message_count
            } else {
                item.value
            };
            let Some(value) = raw.as_ref().and_then(as_number) else {
                tracing::warn!("Skipping {} point with no numeric value on {}", metric, item.date);
                return None;
            };
            let Some(day) = normalize_day(&item.date) else {
                tracing::warn!("Skipping {} point with unparseable date {:?}", metric, item.date);
                return None;
            };
            Some(MetricPoint::new(day, value))
        })
        .collect();

    // newest-first sources are flipped
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if first.date > last.date {
            points.reverse();
        }
    }

    Ok(points)
}

fn as_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn normalize_day(date: &str) -> Option<String> {
    let day = date.get(..10).unwrap_or(date);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}
