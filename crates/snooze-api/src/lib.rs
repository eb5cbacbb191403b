//! Hack or Snooze REST API
//!
//! This crate provides the Axum-based HTTP API: signup and login, user
//! profiles, stories and per-user favorites.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use routes::validation::validate_username;
pub use state::{AppState, MetricsHandle};
