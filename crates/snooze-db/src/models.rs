//! Database models

use crate::utils::parse_datetime_or_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

/// User model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    /// Staff users may act on behalf of any other user
    #[serde(skip_serializing)]
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user (for insertion)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
}

/// Changes to a user (for partial updates)
///
/// Each `Some` field replaces the stored value; `None` leaves it untouched.
/// The password arrives here already hashed.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.password_hash.is_none()
    }

    /// Merge the changes into `user`, field by field
    pub fn apply_to(self, user: &mut User) {
        if let Some(first_name) = self.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            user.last_name = last_name;
        }
        if let Some(password_hash) = self.password_hash {
            user.password_hash = password_hash;
        }
    }
}

/// Story model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Story {
    pub id: String,
    /// Username of the poster
    pub username: String,
    pub author: String,
    pub title: String,
    pub url: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// New story (for insertion)
#[derive(Debug, Clone)]
pub struct NewStory {
    pub id: String,
    pub username: String,
    pub author: String,
    pub title: String,
    pub url: String,
}

// ==================== TryFrom Implementations ====================

impl TryFrom<&sqlx::sqlite::SqliteRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(User {
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            is_staff: row.try_get("is_staff")?,
            date_joined: parse_datetime_or_now(&row.try_get::<String, _>("date_joined")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Story {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Story {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            author: row.try_get("author")?,
            title: row.try_get("title")?,
            url: row.try_get("url")?,
            created: parse_datetime_or_now(&row.try_get::<String, _>("created")?),
            modified: parse_datetime_or_now(&row.try_get::<String, _>("modified")?),
        })
    }
}
