//! A marketplace participant who lists pets for sale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::pet::Pet;

/// A seller row, optionally carrying the pets it owns.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
pub struct Seller {
    /// System-assigned identifier.
    pub id: i64,

    pub name: String,

    /// Unique across all sellers.
    pub email: String,

    pub phone: Option<String>,

    pub address: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Populated only when the caller asked for `include_pets`.
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pets: Option<Vec<Pet>>,
}

/// A seller that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewSeller {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Body of `POST /sellers`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateSellerRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Body of `PUT /sellers/{id}`. Empty or missing strings leave the stored
/// value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateSellerRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}
