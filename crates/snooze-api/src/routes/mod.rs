//! API routes
//!
//! Each endpoint group exposes a `routes()` function; `create_router`
//! mounts them all against one shared state.

mod auth;
mod favorites;
mod health;
pub mod metrics;
mod stories;
mod types;
mod users;
pub mod validation;

#[cfg(test)]
mod test_support;

use axum::Router;
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::{AppState, MetricsHandle};

pub use auth::RequireAuth;

/// Fallback for unmatched routes, so every error body has the same shape
async fn not_found() -> ApiError {
    ApiError::NotFound("Not found.".to_string())
}

/// Create the main router
pub fn create_router(state: AppState, metrics_handle: Option<Arc<MetricsHandle>>) -> Router {
    let mut router = Router::new()
        // Health check
        .merge(health::routes())
        // Signup and login
        .merge(auth::routes())
        .merge(users::routes())
        .merge(stories::routes())
        .merge(favorites::routes())
        .fallback(not_found)
        .with_state(state);

    // Add metrics endpoint if handle is provided
    if let Some(handle) = metrics_handle {
        router = router.merge(metrics::routes(handle));
    }

    router
}
