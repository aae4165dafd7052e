//! HTTP API module for search, categories, health, and metrics endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::{create_router, metrics_router};
