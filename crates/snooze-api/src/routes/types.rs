//! Request/Response DTOs

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use snooze_db::{Story, User};

fn timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// ==================== Auth Types ====================

/// Signup request
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Login request
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Signup/login response
#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

// ==================== User Types ====================

/// Partial user update; omitted fields are left unchanged
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// User response (without password or staff flag)
#[derive(Serialize)]
pub struct UserResponse {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub date_joined: String,
    pub stories: Vec<StoryResponse>,
    pub favorites: Vec<StoryResponse>,
}

impl UserResponse {
    pub fn new(user: User, stories: Vec<Story>, favorites: Vec<Story>) -> Self {
        Self {
            date_joined: timestamp(&user.date_joined),
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            stories: stories.into_iter().map(StoryResponse::from).collect(),
            favorites: favorites.into_iter().map(StoryResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

// ==================== Story Types ====================

/// Create story request
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateStoryRequest {
    pub author: String,
    pub title: String,
    pub url: String,
}

/// Story response
#[derive(Serialize)]
pub struct StoryResponse {
    pub id: String,
    pub username: String,
    pub title: String,
    pub author: String,
    pub url: String,
    pub created: String,
    pub modified: String,
}

impl From<Story> for StoryResponse {
    fn from(story: Story) -> Self {
        Self {
            created: timestamp(&story.created),
            modified: timestamp(&story.modified),
            id: story.id,
            username: story.username,
            title: story.title,
            author: story.author,
            url: story.url,
        }
    }
}

#[derive(Serialize)]
pub struct StoryEnvelope {
    pub story: StoryResponse,
}

#[derive(Serialize)]
pub struct StoriesEnvelope {
    pub stories: Vec<StoryResponse>,
}

/// Delete story response
#[derive(Serialize)]
pub struct StoryDeletedResponse {
    pub deleted: bool,
    pub id: String,
}
