// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod http_metric_source;
pub mod ndjson_stream;
