//! SQLite-backed pet storage.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, SqlitePool, sqlite::Sqlite};

use super::{PetRepository, RepositoryResult};
use crate::models::pet::{NewPet, Pet};

const PET_COLUMNS: &str = "id, name, species, breed, age, price, description, available, \
                           seller_id, created_at, updated_at";

#[derive(Clone)]
pub struct SqlitePetRepository {
    db: SqlitePool,
}

impl SqlitePetRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PetRepository for SqlitePetRepository {
    async fn list(&self, seller_id: Option<i64>) -> RepositoryResult<Vec<Pet>> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!("SELECT {PET_COLUMNS} FROM pets"));
        if let Some(seller_id) = seller_id {
            builder.push(" WHERE seller_id = ");
            builder.push_bind(seller_id);
        }
        builder.push(" ORDER BY id ASC");

        let pets = builder.build_query_as::<Pet>().fetch_all(&self.db).await?;
        Ok(pets)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Pet>> {
        let pet = sqlx::query_as::<_, Pet>(&format!("SELECT {PET_COLUMNS} FROM pets WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(pet)
    }

    async fn find_by_ids(&self, ids: &[i64]) -> RepositoryResult<Vec<Pet>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("SELECT {PET_COLUMNS} FROM pets WHERE id IN ("));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let pets = builder.build_query_as::<Pet>().fetch_all(&self.db).await?;
        Ok(pets)
    }

    async fn create(&self, pet: NewPet) -> RepositoryResult<Pet> {
        let now = Utc::now();
        let created = sqlx::query_as::<_, Pet>(&format!(
            "INSERT INTO pets (
                name, species, breed, age, price, description, available,
                seller_id, created_at, updated_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {PET_COLUMNS}"
        ))
        .bind(&pet.name)
        .bind(&pet.species)
        .bind(&pet.breed)
        .bind(pet.age)
        .bind(pet.price)
        .bind(&pet.description)
        .bind(pet.available)
        .bind(pet.seller_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.db)
        .await?;
        Ok(created)
    }

    async fn update(&self, pet: &Pet) -> RepositoryResult<Option<Pet>> {
        let updated = sqlx::query_as::<_, Pet>(&format!(
            "UPDATE pets
             SET name = ?, species = ?, breed = ?, age = ?, price = ?, description = ?,
                 available = ?, seller_id = ?, updated_at = ?
             WHERE id = ?
             RETURNING {PET_COLUMNS}"
        ))
        .bind(&pet.name)
        .bind(&pet.species)
        .bind(&pet.breed)
        .bind(pet.age)
        .bind(pet.price)
        .bind(&pet.description)
        .bind(pet.available)
        .bind(pet.seller_id)
        .bind(pet.updated_at)
        .bind(pet.id)
        .fetch_optional(&self.db)
        .await?;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM pets WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_by_seller(&self, seller_id: i64) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pets WHERE seller_id = ?")
            .bind(seller_id)
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }
}
