// Error types shared across layers
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatsError {
    #[error("chart {0} not found")]
    ChartNotFound(String),
    #[error("series {0} not found")]
    SeriesNotFound(String),
    #[error("index {index} out of bounds for {len} series")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("unknown metric: {0}")]
    UnknownMetric(String),
    #[error("unknown resolution: {0}")]
    UnknownResolution(String),
    #[error("chart has no data to select a range from")]
    EmptyTable,
}

/// Failure to obtain a series from the upstream stats API.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}
