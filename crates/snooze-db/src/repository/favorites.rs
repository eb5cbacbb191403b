//! Favorite operations

use sqlx::Row;

use crate::error::DbError;
use crate::models::Story;

use super::Database;

impl Database {
    /// Mark a story as a user's favorite
    ///
    /// Returns `false` if it was already a favorite.
    pub async fn add_favorite(&self, username: &str, story_id: &str) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO favorites (username, story_id)
            VALUES (?, ?)
            ON CONFLICT(username, story_id) DO NOTHING
            "#,
        )
        .bind(username)
        .bind(story_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a story from a user's favorites
    ///
    /// Returns `false` if it was not a favorite.
    pub async fn remove_favorite(&self, username: &str, story_id: &str) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM favorites WHERE username = ? AND story_id = ?")
            .bind(username)
            .bind(story_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check whether a story is one of a user's favorites
    pub async fn is_favorited(&self, username: &str, story_id: &str) -> Result<bool, DbError> {
        let result = sqlx::query(
            "SELECT COUNT(*) as count FROM favorites WHERE username = ? AND story_id = ?",
        )
        .bind(username)
        .bind(story_id)
        .fetch_one(&self.pool)
        .await?;
        let count: i64 = result.get("count");
        Ok(count > 0)
    }

    /// List a user's favorite stories in the order they were added
    pub async fn list_favorites(&self, username: &str) -> Result<Vec<Story>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT s.id, s.username, s.author, s.title, s.url, s.created, s.modified
            FROM favorites f
            JOIN stories s ON s.id = f.story_id
            WHERE f.username = ?
            ORDER BY f.id
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Story::try_from(row).map_err(DbError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support::{create_story, create_user, test_db};

    #[tokio::test]
    async fn test_add_and_remove_favorite() {
        let (db, _dir) = test_db().await;
        create_user(&db, "user").await;
        create_user(&db, "user2").await;
        create_story(&db, "story-1", "user").await;

        assert!(!db.is_favorited("user2", "story-1").await.unwrap());
        assert!(db.add_favorite("user2", "story-1").await.unwrap());
        assert!(db.is_favorited("user2", "story-1").await.unwrap());

        // second add is a no-op at this layer
        assert!(!db.add_favorite("user2", "story-1").await.unwrap());
        assert_eq!(db.list_favorites("user2").await.unwrap().len(), 1);

        assert!(db.remove_favorite("user2", "story-1").await.unwrap());
        assert!(!db.remove_favorite("user2", "story-1").await.unwrap());
        assert!(db.list_favorites("user2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_favorites_listed_in_insertion_order() {
        let (db, _dir) = test_db().await;
        create_user(&db, "user").await;
        create_user(&db, "user2").await;
        create_story(&db, "a", "user").await;
        create_story(&db, "b", "user").await;

        db.add_favorite("user2", "b").await.unwrap();
        db.add_favorite("user2", "a").await.unwrap();

        let ids: Vec<String> = db
            .list_favorites("user2")
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_deleting_story_drops_its_favorites() {
        let (db, _dir) = test_db().await;
        create_user(&db, "user").await;
        create_user(&db, "user2").await;
        create_story(&db, "story-1", "user").await;
        db.add_favorite("user2", "story-1").await.unwrap();

        assert!(db.delete_story("story-1").await.unwrap());
        assert!(!db.is_favorited("user2", "story-1").await.unwrap());
        assert!(db.list_favorites("user2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_favorite_of_missing_story_rejected() {
        let (db, _dir) = test_db().await;
        create_user(&db, "user").await;
        assert!(db.add_favorite("user", "nonexistent").await.is_err());
    }
}
