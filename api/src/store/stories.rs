use serde_json::Value;
use sqlx::{sqlite::SqlitePool, types::Json};

pub struct StoryStore;

impl StoryStore {
    pub async fn add(pool: &SqlitePool, user_id: i64, story: &Value) -> Result<i64, sqlx::Error> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO stories (user_id, story) VALUES (?, ?) RETURNING id",
        )
        .bind(user_id)
        .bind(Json(story))
        .fetch_one(pool)
        .await?;
        Ok(id)
    }

    /// All stories for one user, oldest first.
    pub async fn list_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Value>, sqlx::Error> {
        let rows = sqlx::query_scalar::<_, Json<Value>>(
            "SELECT story FROM stories WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|Json(story)| story).collect())
    }
}
