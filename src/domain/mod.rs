// Domain layer - Core chart and metric models
pub mod chart;
pub mod error;
pub mod metric;
pub mod series;
