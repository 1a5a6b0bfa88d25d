//! Per-user pet collections kept in the document store.

use serde::{Deserialize, Serialize};

/// One document per user in a bucket collection: `{ userId, pets: [...] }`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct BucketDocument {
    #[serde(rename = "userId")]
    pub user_id: i64,

    /// Pet ids in insertion order; duplicates allowed.
    #[serde(default)]
    pub pets: Vec<i64>,
}

/// Which bucket collection an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BucketKind {
    Favorites,
    Cart,
}

impl BucketKind {
    /// Document-store collection backing this bucket.
    pub fn collection(self) -> &'static str {
        match self {
            BucketKind::Favorites => "favorites",
            BucketKind::Cart => "cart",
        }
    }
}

/// Body of `POST /users/{id}/favorites` and `POST /users/{id}/cart`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddPetRequest {
    pub pet_id: i64,
}
