//! Story operations

use chrono::Utc;

use crate::error::DbError;
use crate::models::{NewStory, Story};
use crate::utils::format_datetime;

use super::Database;

impl Database {
    /// Insert a new story
    pub async fn insert_story(&self, story: NewStory) -> Result<Story, DbError> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO stories (id, username, author, title, url, created, modified)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&story.id)
        .bind(&story.username)
        .bind(&story.author)
        .bind(&story.title)
        .bind(&story.url)
        .bind(format_datetime(&now))
        .bind(format_datetime(&now))
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_insert(e, format!("Story '{}' already exists", story.id)))?;

        Ok(Story {
            id: story.id,
            username: story.username,
            author: story.author,
            title: story.title,
            url: story.url,
            created: now,
            modified: now,
        })
    }

    /// Get a story by ID
    pub async fn get_story(&self, id: &str) -> Result<Option<Story>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, username, author, title, url, created, modified
            FROM stories
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Story::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all stories, newest first
    pub async fn list_stories(&self) -> Result<Vec<Story>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, username, author, title, url, created, modified
            FROM stories
            ORDER BY created DESC, rowid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Story::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// List stories posted by a user, newest first
    pub async fn list_stories_by_user(&self, username: &str) -> Result<Vec<Story>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, username, author, title, url, created, modified
            FROM stories
            WHERE username = ?
            ORDER BY created DESC, rowid DESC
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Story::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Delete a story (favorites of it go with it)
    pub async fn delete_story(&self, id: &str) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM stories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
