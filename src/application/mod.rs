// Application layer - Chart pipeline and use cases
pub mod chart_service;
pub mod chart_session;
pub mod merge;
pub mod metric_source;
pub mod registry;
pub mod render;
pub mod resampler;
pub mod viewport;
