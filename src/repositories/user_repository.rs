//! SQLite-backed user (buyer) storage.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::{RepositoryError, RepositoryResult, UserRepository, is_unique_violation};
use crate::models::user::{NewUser, User};

const USER_COLUMNS: &str = "id, name, email, phone, address, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteUserRepository {
    db: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn list(&self) -> RepositoryResult<Vec<User>> {
        let users =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC"))
                .fetch_all(&self.db)
                .await?;
        Ok(users)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> RepositoryResult<User> {
        let now = Utc::now();
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, phone, address, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(now)
        .bind(now)
        .fetch_one(&self.db)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                RepositoryError::Duplicate(user.email.clone())
            } else {
                RepositoryError::Sqlx(err)
            }
        })
    }

    async fn update(&self, user: &User) -> RepositoryResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET name = ?, email = ?, phone = ?, address = ?, updated_at = ?
             WHERE id = ?
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(user.updated_at)
        .bind(user.id)
        .fetch_optional(&self.db)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                RepositoryError::Duplicate(user.email.clone())
            } else {
                RepositoryError::Sqlx(err)
            }
        })
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
