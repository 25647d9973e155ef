// Source trait for per-entity metric series
use crate::domain::error::SourceError;
use crate::domain::metric::{MetricKey, MetricPoint};
use async_trait::async_trait;

#[async_trait]
pub trait MetricSource: Send + Sync {
    /// Fetch the full daily series of `metric` for one entity (chain),
    /// in ascending date order.
    async fn fetch_series(
        &self,
        entity_id: &str,
        metric: MetricKey,
    ) -> Result<Vec<MetricPoint>, SourceError>;
}
