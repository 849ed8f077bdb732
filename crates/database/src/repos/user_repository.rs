//! Repository for user accounts.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::entities::user::{NewUser, User};
use crate::types::DatabaseResult;
use crate::{new_id, now};

const USER_COLUMNS: &str = "id, email, name, password_hash, role, created_at, updated_at";

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a user on an existing connection, typically inside a transaction.
    pub async fn insert(conn: &mut SqliteConnection, new_user: &NewUser) -> DatabaseResult<User> {
        let id = new_id();
        let timestamp = now();
        sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, role, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(new_user.email.trim().to_lowercase())
        .bind(&new_user.name)
        .bind(&new_user.password_hash)
        .bind(new_user.role.as_str())
        .bind(&timestamp)
        .bind(&timestamp)
        .execute(&mut *conn)
        .await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(&id)
        .fetch_one(&mut *conn)
        .await?;

        info!(user_id = %user.id, role = %user.role, "user created");
        Ok(user)
    }

    pub async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        let mut conn = self.pool.acquire().await?;
        Self::insert(&mut conn, new_user).await
    }

    pub async fn find_by_id(&self, id: &str) -> DatabaseResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Emails are stored lower-cased, so lookups are case-insensitive.
    pub async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn email_exists(&self, email: &str) -> DatabaseResult<bool> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email.trim().to_lowercase())
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_database;
    use crate::entities::user::UserRole;
    use crate::DatabaseError;

    fn donor(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            name: "Dana Donor".to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::Donor,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let (pool, _temp_dir) = create_test_database().await;
        let repo = UserRepository::new(pool);

        let created = repo.create(&donor("Dana@Example.org")).await.unwrap();
        assert_eq!(created.email, "dana@example.org");
        assert_eq!(created.role, UserRole::Donor);

        let by_email = repo.find_by_email("DANA@example.org").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);

        let by_id = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.password_hash, "hash");
        assert!(repo.email_exists("dana@example.org").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let (pool, _temp_dir) = create_test_database().await;
        let repo = UserRepository::new(pool);

        repo.create(&donor("dup@example.org")).await.unwrap();
        let error = repo.create(&donor("dup@example.org")).await.unwrap_err();

        assert!(matches!(error, DatabaseError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_missing_user_is_none() {
        let (pool, _temp_dir) = create_test_database().await;
        let repo = UserRepository::new(pool);

        assert!(repo.find_by_id("missing").await.unwrap().is_none());
        assert!(!repo.email_exists("nobody@example.org").await.unwrap());
    }
}
