// HTTP mapping of domain errors
use crate::domain::error::StatsError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for StatsError {
    fn into_response(self) -> Response {
        let status = match &self {
            StatsError::ChartNotFound(_) | StatsError::SeriesNotFound(_) => StatusCode::NOT_FOUND,
            StatsError::IndexOutOfBounds { .. }
            | StatsError::UnknownMetric(_)
            | StatsError::UnknownResolution(_)
            | StatsError::EmptyTable => StatusCode::BAD_REQUEST,
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
