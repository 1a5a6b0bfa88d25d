//! Data-access layer.
//!
//! Each entity has a capability trait that services depend on through
//! `Arc<dyn Trait>`. Store implementations live next to the trait they
//! implement; `memory` holds in-memory implementations for tests.
//!
//! Repositories never decide domain errors: a missing row is `Ok(None)` (or
//! `Ok(false)` for deletes) and the service layer turns it into `NotFound`.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    bucket::BucketDocument,
    pet::{NewPet, Pet},
    seller::{NewSeller, Seller},
    user::{NewUser, User},
};

pub mod bucket_repository;
pub mod memory;
pub mod pet_repository;
pub mod seller_repository;
pub mod user_repository;

pub use bucket_repository::MongoBucketRepository;
pub use pet_repository::SqlitePetRepository;
pub use seller_repository::SqliteSellerRepository;
pub use user_repository::SqliteUserRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A unique constraint rejected the write; carries the offending value.
    #[error("duplicate value `{0}`")]
    Duplicate(String),
    #[error("document store operation `{op}` timed out after {after:?}")]
    Timeout { op: &'static str, after: Duration },
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait SellerRepository: Send + Sync {
    /// All sellers ordered by id.
    async fn list(&self) -> RepositoryResult<Vec<Seller>>;
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Seller>>;
    async fn create(&self, seller: NewSeller) -> RepositoryResult<Seller>;
    /// Persist every mutable column of `seller`. `None` if the row vanished.
    async fn update(&self, seller: &Seller) -> RepositoryResult<Option<Seller>>;
    /// Returns true if a row was deleted.
    async fn delete(&self, id: i64) -> RepositoryResult<bool>;
}

#[async_trait]
pub trait PetRepository: Send + Sync {
    /// All pets ordered by id, optionally restricted to one seller.
    async fn list(&self, seller_id: Option<i64>) -> RepositoryResult<Vec<Pet>>;
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Pet>>;
    /// Pets whose id is in `ids`, in no particular order. Unknown ids are
    /// skipped.
    async fn find_by_ids(&self, ids: &[i64]) -> RepositoryResult<Vec<Pet>>;
    async fn create(&self, pet: NewPet) -> RepositoryResult<Pet>;
    async fn update(&self, pet: &Pet) -> RepositoryResult<Option<Pet>>;
    async fn delete(&self, id: i64) -> RepositoryResult<bool>;
    async fn count_by_seller(&self, seller_id: i64) -> RepositoryResult<i64>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> RepositoryResult<Vec<User>>;
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>>;
    async fn create(&self, user: NewUser) -> RepositoryResult<User>;
    async fn update(&self, user: &User) -> RepositoryResult<Option<User>>;
    async fn delete(&self, id: i64) -> RepositoryResult<bool>;
}

/// One bucket collection (favorites or cart) in the document store.
#[async_trait]
pub trait BucketRepository: Send + Sync {
    /// Append `pet_id` to the user's list, creating the document if needed.
    async fn add_pet(&self, user_id: i64, pet_id: i64) -> RepositoryResult<()>;
    /// Remove a single occurrence of `pet_id`; no-op if it is not present.
    async fn remove_pet(&self, user_id: i64, pet_id: i64) -> RepositoryResult<()>;
    /// The user's document, or `None` if they never added anything.
    async fn find_by_user(&self, user_id: i64) -> RepositoryResult<Option<BucketDocument>>;
    /// Round-trip to the store, for readiness checks.
    async fn ping(&self) -> RepositoryResult<()>;
}

/// Return true if a SQLx error is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.message().to_ascii_lowercase().contains("unique")
    )
}
