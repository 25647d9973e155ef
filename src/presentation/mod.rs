// Presentation layer - HTTP surface
pub mod app_state;
pub mod error_response;
pub mod handlers;
pub mod routes;
