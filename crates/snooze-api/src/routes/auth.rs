//! Authentication extractor and signup/login routes

use axum::{
    Json, Router,
    extract::{FromRef, FromRequestParts, State, rejection::JsonRejection},
    http::{StatusCode, request::Parts},
    routing::post,
};
use snooze_auth::{AUTH_HEADER, AuthError, Principal, generate_token, hash_password, verify_password};
use snooze_db::{DbError, NewUser};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{AuthResponse, LoginRequest, SignupRequest};
use super::users::user_response;
use super::validation::{validate_name, validate_password, validate_username};

// ==================== Auth Extractor ====================

/// Extractor for the principal named by the `token` header (required)
///
/// Rejects with 401 before the handler runs when the header is missing,
/// empty, malformed, forged, or names a user that does not exist.
pub struct RequireAuth(pub Principal);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = parts
            .headers
            .get(AUTH_HEADER)
            .and_then(|h| h.to_str().ok());

        let principal = app_state.auth.verify(token).await?;
        Ok(RequireAuth(principal))
    }
}

// ==================== Auth Routes ====================

/// POST /api/users/signup
async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(request) = payload?;

    validate_username(&request.username)?;
    validate_password(&request.password)?;
    validate_name("first_name", &request.first_name)?;
    validate_name("last_name", &request.last_name)?;

    debug!("Signup attempt for user: {}", request.username);

    let password_hash = hash_password(&request.password)?;

    let user = state
        .db
        .insert_user(NewUser {
            username: request.username,
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
            is_staff: false,
        })
        .await
        .map_err(|e| match e {
            DbError::Duplicate(_) => ApiError::Unprocessable("Username already exists.".to_string()),
            other => other.into(),
        })?;

    info!("User {} signed up", user.username);

    let token = generate_token(&user.username);
    let user = user_response(&state.db, user).await?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// POST /api/users/login
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(request) = payload?;

    // Bound the work an oversized password can force on the verifier
    validate_password(&request.password)?;

    debug!("Login attempt for user: {}", request.username);

    // Find user - but don't return early to prevent timing attacks
    let user_result = state.db.get_user_by_username(&request.username).await?;

    // Verify password - always perform verification to prevent timing attacks
    // Use a dummy hash when user doesn't exist to maintain constant-time behavior
    // This dummy hash is a valid Argon2 hash that will always fail verification
    const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$dGltaW5nX2F0dGFja19wcmV2ZW50aW9u$K8rI5T7VdQ8xkO0GqK5K2w";

    let (hash_to_verify, user) = match user_result {
        Some(u) => (u.password_hash.clone(), Some(u)),
        None => (DUMMY_HASH.to_string(), None),
    };

    let password_valid = match verify_password(&request.password, &hash_to_verify) {
        Ok(valid) => valid,
        Err(_) if user.is_none() => false,
        Err(e) => return Err(e.into()),
    };

    let user = match (user, password_valid) {
        (Some(u), true) => u,
        _ => {
            debug!("Login failed for user: {}", request.username);
            metrics::counter!("snooze_auth_failures_total", "reason" => "invalid_credentials")
                .increment(1);
            return Err(AuthError::InvalidCredentials.into());
        }
    };

    info!("User {} logged in", user.username);
    metrics::counter!("snooze_logins_total").increment(1);

    let token = generate_token(&user.username);
    let user = user_response(&state.db, user).await?;

    Ok(Json(AuthResponse { token, user }))
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/users/signup", post(signup))
        .route("/api/users/login", post(login))
}
