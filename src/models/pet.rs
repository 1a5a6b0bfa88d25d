//! A sellable pet, owned by exactly one seller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::seller::Seller;

#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
pub struct Pet {
    /// System-assigned identifier.
    pub id: i64,

    pub name: String,

    pub species: String,

    pub breed: Option<String>,

    /// Age in years, never negative.
    pub age: i32,

    /// Asking price, never negative.
    pub price: f64,

    pub description: Option<String>,

    pub available: bool,

    /// Owning seller; must reference an existing row.
    pub seller_id: i64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Populated only when the caller asked for `include_seller`.
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<Box<Seller>>,
}

/// A pet that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub age: i32,
    pub price: f64,
    pub description: Option<String>,
    pub available: bool,
    pub seller_id: i64,
}

/// Body of `POST /pets`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CreatePetRequest {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: i32,
    pub price: f64,
    pub description: String,
    pub available: bool,
    pub seller_id: i64,
}

impl Default for CreatePetRequest {
    fn default() -> Self {
        Self {
            name: String::new(),
            species: String::new(),
            breed: String::new(),
            age: 0,
            price: 0.0,
            description: String::new(),
            available: true,
            seller_id: 0,
        }
    }
}

/// Body of `PUT /pets/{id}`.
///
/// Strings overwrite only when non-empty. `age`, `price` and `seller_id`
/// overwrite only when strictly positive, so a zero in the body means "leave
/// unchanged" rather than "set to zero". `available` overwrites whenever it
/// is present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdatePetRequest {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: i32,
    pub price: f64,
    pub description: String,
    pub available: Option<bool>,
    pub seller_id: i64,
}
