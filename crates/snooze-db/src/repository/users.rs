//! User operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewUser, User, UserChanges};
use crate::repository::Database;
use crate::utils::format_datetime;

impl Database {
    // ==================== User Operations ====================

    /// Insert a new user
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let now = Utc::now();

        // Check if user already exists
        let existing = self.get_user_by_username(&user.username).await?;
        if existing.is_some() {
            return Err(DbError::Duplicate(format!("User '{}' already exists", user.username)));
        }

        sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, first_name, last_name, is_staff, date_joined, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_staff)
        .bind(format_datetime(&now))
        .bind(format_datetime(&now))
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_insert(e, format!("User '{}' already exists", user.username)))?;

        Ok(User {
            username: user.username,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            is_staff: user.is_staff,
            date_joined: now,
            updated_at: now,
        })
    }

    /// Get a user by username
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT username, password_hash, first_name, last_name, is_staff, date_joined, updated_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Apply a partial update to a user
    ///
    /// Returns the updated user, or `None` if no such user exists.
    pub async fn update_user(
        &self,
        username: &str,
        changes: UserChanges,
    ) -> Result<Option<User>, DbError> {
        let Some(mut user) = self.get_user_by_username(username).await? else {
            return Ok(None);
        };

        changes.apply_to(&mut user);
        user.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = ?, first_name = ?, last_name = ?, updated_at = ?
            WHERE username = ?
            "#,
        )
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(format_datetime(&user.updated_at))
        .bind(&user.username)
        .execute(&self.pool)
        .await?;

        Ok(Some(user))
    }

    /// Check if any users exist
    pub async fn has_users(&self) -> Result<bool, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM users")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = result.get("count");
        Ok(count > 0)
    }
}
