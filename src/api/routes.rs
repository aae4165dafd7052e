//! HTTP API route definitions.

use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;

use super::handlers::{categories, health, search, AppState};
use crate::connector::Connector;

/// Create the API router.
pub fn create_router<C: Connector>(state: AppState<C>) -> Router {
    Router::new()
        // Health endpoint
        .route("/health", get(health))
        // Catalog endpoints
        .route("/search", get(search::<C>))
        .route("/categories", get(categories::<C>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router exposing the Prometheus scrape endpoint.
pub fn metrics_router(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}
