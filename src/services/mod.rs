//! Business rules: validation, existence checks, the seller-deletion guard
//! and partial-update merging. This is the only layer that decides domain
//! error kinds.

use thiserror::Error;

use crate::repositories::RepositoryError;

pub mod bucket_service;
pub mod pet_service;
pub mod seller_service;
pub mod user_service;

pub use bucket_service::BucketService;
pub use pet_service::PetService;
pub use seller_service::SellerService;
pub use user_service::UserService;

pub const SELLER_NOT_FOUND: &str = "seller not found";
pub const PET_NOT_FOUND: &str = "pet not found";
pub const USER_NOT_FOUND: &str = "user not found";
pub const SELLER_HAS_PETS: &str = "cannot delete seller with existing pets";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Turn a unique-constraint failure into a conflict naming `entity`.
    fn from_write(err: RepositoryError, entity: &str) -> Self {
        match err {
            RepositoryError::Duplicate(_) => Self::Conflict(format!("{entity} email already exists")),
            other => Self::Repository(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Values are stored trimmed, so `" a@x.com "` and `"a@x.com"` collide on
/// the unique email column.
fn trimmed(value: String) -> String {
    value.trim().to_owned()
}

/// Empty strings mean "not provided" for optional columns.
fn optional(value: String) -> Option<String> {
    if is_blank(&value) { None } else { Some(trimmed(value)) }
}

/// Partial-update rule for strings: only a non-empty value overwrites.
fn merge_string(target: &mut String, value: String) {
    if !is_blank(&value) {
        *target = trimmed(value);
    }
}

fn merge_optional(target: &mut Option<String>, value: String) {
    if !is_blank(&value) {
        *target = Some(trimmed(value));
    }
}
