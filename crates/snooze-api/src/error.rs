//! API error types

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("Database error: {0}")]
    Database(#[from] snooze_db::DbError),

    #[error("Auth error: {0}")]
    Auth(#[from] snooze_auth::AuthError),
}

const INTERNAL_DETAIL: &str = "Internal server error";

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            ApiError::Body(rejection) => (rejection.status(), rejection.body_text()),
            ApiError::Database(e) => match e {
                snooze_db::DbError::Duplicate(msg) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, msg.clone())
                }
                _ => {
                    error!("Database error: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_DETAIL.to_string())
                }
            },
            // Every authentication or authorization failure looks the same from outside
            ApiError::Auth(e) if e.is_unauthorized() => {
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }
            ApiError::Auth(e) => {
                error!("Auth error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_DETAIL.to_string())
            }
        };

        (status, axum::Json(json!({ "detail": detail }))).into_response()
    }
}
