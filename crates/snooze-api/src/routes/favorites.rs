//! Favorite routes

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::RequireAuth;
use super::types::UserEnvelope;
use super::users::user_response;

/// POST /api/favorites/{username}/{story_id}/favorite
async fn add_favorite(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path((username, story_id)): Path<(String, String)>,
) -> Result<Json<UserEnvelope>, ApiError> {
    principal.require_same_user_or_staff(&username)?;

    // Staff may name a user that does not exist
    let user = state
        .db
        .get_user_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;

    let story = state
        .db
        .get_story(&story_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Story not found.".to_string()))?;

    if story.username == user.username {
        return Err(ApiError::BadRequest(
            "Cannot add own user stories to favorites".to_string(),
        ));
    }

    if !state.db.add_favorite(&user.username, &story.id).await? {
        return Err(ApiError::BadRequest("Story already favorited.".to_string()));
    }

    info!("User {} favorited story {}", user.username, story.id);

    Ok(Json(UserEnvelope {
        user: user_response(&state.db, user).await?,
    }))
}

/// POST /api/favorites/{username}/{story_id}/unfavorite
async fn remove_favorite(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path((username, story_id)): Path<(String, String)>,
) -> Result<Json<UserEnvelope>, ApiError> {
    principal.require_same_user_or_staff(&username)?;

    if !state.db.remove_favorite(&username, &story_id).await? {
        return Err(ApiError::NotFound("Favorite not found.".to_string()));
    }

    let user = state
        .db
        .get_user_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;

    info!("User {} unfavorited story {}", user.username, story_id);

    Ok(Json(UserEnvelope {
        user: user_response(&state.db, user).await?,
    }))
}

/// Create favorite routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/favorites/{username}/{story_id}/favorite",
            post(add_favorite),
        )
        .route(
            "/api/favorites/{username}/{story_id}/unfavorite",
            post(remove_favorite),
        )
}
