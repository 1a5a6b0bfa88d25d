//! SQLite-backed seller storage.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::{RepositoryError, RepositoryResult, SellerRepository, is_unique_violation};
use crate::models::seller::{NewSeller, Seller};

const SELLER_COLUMNS: &str = "id, name, email, phone, address, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteSellerRepository {
    db: SqlitePool,
}

impl SqliteSellerRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SellerRepository for SqliteSellerRepository {
    async fn list(&self) -> RepositoryResult<Vec<Seller>> {
        let sellers = sqlx::query_as::<_, Seller>(&format!(
            "SELECT {SELLER_COLUMNS} FROM sellers ORDER BY id ASC"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(sellers)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Seller>> {
        let seller = sqlx::query_as::<_, Seller>(&format!(
            "SELECT {SELLER_COLUMNS} FROM sellers WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(seller)
    }

    async fn create(&self, seller: NewSeller) -> RepositoryResult<Seller> {
        let now = Utc::now();
        sqlx::query_as::<_, Seller>(&format!(
            "INSERT INTO sellers (name, email, phone, address, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {SELLER_COLUMNS}"
        ))
        .bind(&seller.name)
        .bind(&seller.email)
        .bind(&seller.phone)
        .bind(&seller.address)
        .bind(now)
        .bind(now)
        .fetch_one(&self.db)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                RepositoryError::Duplicate(seller.email.clone())
            } else {
                RepositoryError::Sqlx(err)
            }
        })
    }

    async fn update(&self, seller: &Seller) -> RepositoryResult<Option<Seller>> {
        sqlx::query_as::<_, Seller>(&format!(
            "UPDATE sellers
             SET name = ?, email = ?, phone = ?, address = ?, updated_at = ?
             WHERE id = ?
             RETURNING {SELLER_COLUMNS}"
        ))
        .bind(&seller.name)
        .bind(&seller.email)
        .bind(&seller.phone)
        .bind(&seller.address)
        .bind(seller.updated_at)
        .bind(seller.id)
        .fetch_optional(&self.db)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                RepositoryError::Duplicate(seller.email.clone())
            } else {
                RepositoryError::Sqlx(err)
            }
        })
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM sellers WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
