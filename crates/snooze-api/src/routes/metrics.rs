//! Prometheus metrics endpoint

use axum::{Router, extract::State, http::header, response::IntoResponse, routing::get};
use std::sync::Arc;

use crate::state::MetricsHandle;

const CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Create metrics routes with the Prometheus handle
///
/// Mounted outside the application state so the endpoint exists only when
/// a recorder has been installed.
pub fn routes(handle: Arc<MetricsHandle>) -> Router {
    Router::new()
        .route("/metrics", get(get_metrics))
        .with_state(handle)
}

/// GET /metrics
async fn get_metrics(State(handle): State<Arc<MetricsHandle>>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, CONTENT_TYPE)], handle.render())
}
