// Router assembly
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    add_series, create_chart, delete_chart, get_chart, health_check, list_metrics, remove_series,
    reorder, retry_series, set_resolution, set_stacking, set_viewport, stream_load,
    toggle_visibility, update_style,
};
use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/metrics", get(list_metrics))
        .route("/charts", post(create_chart))
        .route("/charts/:id", get(get_chart).delete(delete_chart))
        .route("/charts/:id/series", post(add_series))
        .route(
            "/charts/:id/series/:series_id",
            axum::routing::delete(remove_series).patch(update_style),
        )
        .route(
            "/charts/:id/series/:series_id/visibility",
            post(toggle_visibility),
        )
        .route("/charts/:id/series/:series_id/retry", post(retry_series))
        .route("/charts/:id/reorder", post(reorder))
        .route("/charts/:id/resolution", put(set_resolution))
        .route("/charts/:id/viewport", put(set_viewport))
        .route("/charts/:id/stacking", put(set_stacking))
        .route("/charts/:id/load", get(stream_load))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
