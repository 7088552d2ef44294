use sqlx::sqlite::SqlitePool;

use crate::error::AppError;
use crate::models::user::{NewUser, User};

pub struct AccountStore;

impl AccountStore {
    /// Insert a new account. A taken email is [`AppError::DuplicateEmail`].
    pub async fn create(pool: &SqlitePool, new_user: &NewUser<'_>) -> Result<User, AppError> {
        let result = sqlx::query_as::<_, User>(
            "INSERT INTO users (full_name, email, password_hash, profile_pic) VALUES (?, ?, ?, ?) \
             RETURNING id, full_name, email, password_hash, profile_pic, created_at",
        )
        .bind(new_user.full_name)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.profile_pic)
        .fetch_one(pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(e) => match e.as_database_error() {
                Some(db_err) if db_err.is_unique_violation() => Err(AppError::DuplicateEmail),
                _ => Err(AppError::Sqlx(e)),
            },
        }
    }

    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, full_name, email, password_hash, profile_pic, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, full_name, email, password_hash, profile_pic, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_pool;

    fn new_user<'a>(full_name: &'a str, email: &'a str) -> NewUser<'a> {
        NewUser {
            full_name,
            email,
            password_hash: "$argon2id$fake",
            profile_pic: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = test_pool().await;
        let created = AccountStore::create(&pool, &new_user("A", "a@x.com"))
            .await
            .unwrap();
        assert!(created.id > 0);

        let by_email = AccountStore::find_by_email(&pool, "a@x.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, created.id);
        assert_eq!(by_email.full_name, "A");

        let by_id = AccountStore::find_by_id(&pool, created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_id.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_and_first_account_kept() {
        let pool = test_pool().await;
        let first = AccountStore::create(&pool, &new_user("First", "dup@x.com"))
            .await
            .unwrap();

        let err = AccountStore::create(&pool, &new_user("Second", "dup@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));

        let stored = AccountStore::find_by_email(&pool, "dup@x.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, first.id);
        assert_eq!(stored.full_name, "First");
    }

    #[tokio::test]
    async fn test_missing_account_is_none() {
        let pool = test_pool().await;
        assert!(AccountStore::find_by_email(&pool, "nobody@x.com")
            .await
            .unwrap()
            .is_none());
        assert!(AccountStore::find_by_id(&pool, 999).await.unwrap().is_none());
    }
}
