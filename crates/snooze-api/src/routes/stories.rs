//! Story routes

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use snooze_db::NewStory;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::RequireAuth;
use super::types::{
    CreateStoryRequest, StoriesEnvelope, StoryDeletedResponse, StoryEnvelope, StoryResponse,
};
use super::validation::validate_story;

fn story_not_found() -> ApiError {
    ApiError::NotFound("Story not found.".to_string())
}

/// GET /api/stories
async fn list_stories(State(state): State<AppState>) -> Result<Json<StoriesEnvelope>, ApiError> {
    let stories = state.db.list_stories().await?;
    Ok(Json(StoriesEnvelope {
        stories: stories.into_iter().map(StoryResponse::from).collect(),
    }))
}

/// GET /api/stories/{story_id}
async fn get_story(
    State(state): State<AppState>,
    Path(story_id): Path<String>,
) -> Result<Json<StoryEnvelope>, ApiError> {
    let story = state
        .db
        .get_story(&story_id)
        .await?
        .ok_or_else(story_not_found)?;

    Ok(Json(StoryEnvelope {
        story: story.into(),
    }))
}

/// POST /api/stories
async fn create_story(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    payload: Result<Json<CreateStoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StoryEnvelope>), ApiError> {
    let Json(request) = payload?;
    validate_story(&request.author, &request.title, &request.url)?;

    let story = state
        .db
        .insert_story(NewStory {
            id: Uuid::new_v4().to_string(),
            username: principal.username,
            author: request.author,
            title: request.title,
            url: request.url,
        })
        .await?;

    info!("Story {} posted by {}", story.id, story.username);

    Ok((
        StatusCode::CREATED,
        Json(StoryEnvelope {
            story: story.into(),
        }),
    ))
}

/// DELETE /api/stories/{story_id}
async fn delete_story(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path(story_id): Path<String>,
) -> Result<Json<StoryDeletedResponse>, ApiError> {
    let story = state
        .db
        .get_story(&story_id)
        .await?
        .ok_or_else(story_not_found)?;

    principal.require_same_user_or_staff(&story.username)?;

    if !state.db.delete_story(&story.id).await? {
        return Err(story_not_found());
    }

    info!("Story {} deleted by {}", story.id, principal.username);

    Ok(Json(StoryDeletedResponse {
        deleted: true,
        id: story.id,
    }))
}

/// Create story routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/stories", get(list_stories).post(create_story))
        .route("/api/stories/{story_id}", get(get_story).delete(delete_story))
}
