//! User profile routes

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::get,
};
use snooze_auth::hash_password;
use snooze_db::{Database, User, UserChanges};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::RequireAuth;
use super::types::{UpdateUserRequest, UserEnvelope, UserResponse};
use super::validation::{validate_name, validate_password};

/// Build the public representation of a user, with their stories and favorites
pub(crate) async fn user_response(db: &Database, user: User) -> Result<UserResponse, ApiError> {
    let stories = db.list_stories_by_user(&user.username).await?;
    let favorites = db.list_favorites(&user.username).await?;
    Ok(UserResponse::new(user, stories, favorites))
}

/// Turn an update request into validated changes, hashing a new password
fn user_changes(request: UpdateUserRequest) -> Result<UserChanges, ApiError> {
    let mut changes = UserChanges::default();

    if let Some(first_name) = request.first_name {
        validate_name("first_name", &first_name)?;
        changes.first_name = Some(first_name);
    }
    if let Some(last_name) = request.last_name {
        validate_name("last_name", &last_name)?;
        changes.last_name = Some(last_name);
    }
    if let Some(password) = request.password {
        validate_password(&password)?;
        changes.password_hash = Some(hash_password(&password)?);
    }

    Ok(changes)
}

/// GET /api/users/{username}
async fn get_user(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path(username): Path<String>,
) -> Result<Json<UserEnvelope>, ApiError> {
    principal.require_same_user_or_staff(&username)?;

    let user = state
        .db
        .get_user_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;

    Ok(Json(UserEnvelope {
        user: user_response(&state.db, user).await?,
    }))
}

/// PATCH /api/users/{username}
async fn update_user(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path(username): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserEnvelope>, ApiError> {
    principal.require_same_user_or_staff(&username)?;

    let Json(request) = payload?;
    let changes = user_changes(request)?;
    if changes.is_empty() {
        return Err(ApiError::BadRequest("No fields to update.".to_string()));
    }

    let user = state
        .db
        .update_user(&username, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;

    info!("User {} updated by {}", user.username, principal.username);

    Ok(Json(UserEnvelope {
        user: user_response(&state.db, user).await?,
    }))
}

/// Create user routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/users/{username}", get(get_user).patch(update_user))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use snooze_auth::verify_password;

    use crate::routes::test_support::TestApp;

    async fn setup() -> (TestApp, String, String, String) {
        let app = TestApp::new().await;
        let user = app.create_user("user", false).await;
        let user2 = app.create_user("user2", false).await;
        let staff = app.create_user("staffUser", true).await;
        (app, user, user2, staff)
    }

    #[tokio::test]
    async fn test_get_user_as_self() {
        let (app, user, _, _) = setup().await;
        let story = app.create_story("story-1", "user").await;

        let (status, body) = app.get("/api/users/user", Some(&user)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["username"], "user");
        assert_eq!(body["user"]["first_name"], "userFirst");
        assert_eq!(body["user"]["stories"][0]["id"], story.id);
        assert_eq!(body["user"]["favorites"], json!([]));
        assert!(body["user"].get("password").is_none());
        assert!(body["user"].get("is_staff").is_none());
    }

    #[tokio::test]
    async fn test_get_user_as_staff() {
        let (app, _, _, staff) = setup().await;
        let (status, body) = app.get("/api/users/user", Some(&staff)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["username"], "user");
    }

    #[tokio::test]
    async fn test_get_user_fail_other_user() {
        let (app, _, user2, _) = setup().await;
        let (status, body) = app.get("/api/users/user", Some(&user2)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "detail": "Unauthorized" }));
    }

    #[tokio::test]
    async fn test_get_user_fail_bad_tokens() {
        let (app, _, _, _) = setup().await;
        let (status, _) = app.get("/api/users/user", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        for token in ["", "malformed::token", "user:abcdef123456"] {
            let (status, body) = app.get("/api/users/user", Some(token)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{token:?}");
            assert_eq!(body, json!({ "detail": "Unauthorized" }));
        }
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let (app, _, user2, staff) = setup().await;

        let (status, body) = app.get("/api/users/ghost", Some(&staff)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "detail": "User not found." }));

        // a non-staff user learns nothing about other usernames
        let (status, _) = app.get("/api/users/ghost", Some(&user2)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_patch_user_names() {
        let (app, user, _, _) = setup().await;

        let (status, body) = app
            .patch(
                "/api/users/user",
                Some(&user),
                Some(json!({ "first_name": "New" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["first_name"], "New");
        assert_eq!(body["user"]["last_name"], "userLast");
    }

    #[tokio::test]
    async fn test_patch_user_password_is_hashed() {
        let (app, user, _, _) = setup().await;

        let (status, _) = app
            .patch(
                "/api/users/user",
                Some(&user),
                Some(json!({ "password": "new-password" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let stored = app.db.get_user_by_username("user").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "new-password");
        assert!(verify_password("new-password", &stored.password_hash).unwrap());

        // the token is derived from the username only
        let (status, _) = app.get("/api/users/user", Some(&user)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_patch_user_as_staff() {
        let (app, _, _, staff) = setup().await;
        let (status, body) = app
            .patch(
                "/api/users/user2",
                Some(&staff),
                Some(json!({ "last_name": "Changed" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["last_name"], "Changed");
    }

    #[tokio::test]
    async fn test_patch_user_fail_other_user_leaves_data() {
        let (app, _, user2, _) = setup().await;
        let (status, _) = app
            .patch(
                "/api/users/user",
                Some(&user2),
                Some(json!({ "first_name": "Hacked" })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let stored = app.db.get_user_by_username("user").await.unwrap().unwrap();
        assert_eq!(stored.first_name, "userFirst");
    }

    #[tokio::test]
    async fn test_patch_user_fail_empty_or_invalid() {
        let (app, user, _, _) = setup().await;

        let (status, _) = app.patch("/api/users/user", Some(&user), Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .patch("/api/users/user", Some(&user), Some(json!({ "first_name": "  " })))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = app
            .patch("/api/users/user", Some(&user), Some(json!({ "username": "renamed" })))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
