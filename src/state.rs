//! Shared handler state: one service per entity plus the SQLite pool for
//! readiness checks.

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::{
    models::bucket::BucketKind,
    repositories::{
        BucketRepository, PetRepository, SellerRepository, SqlitePetRepository,
        SqliteSellerRepository, SqliteUserRepository,
    },
    services::{BucketService, PetService, SellerService, UserService},
};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub sellers: SellerService,
    pub pets: PetService,
    pub users: UserService,
    pub favorites: BucketService,
    pub cart: BucketService,
}

impl AppState {
    /// Wire the SQLite repositories over `db` together with the given bucket
    /// stores.
    pub fn new(
        db: SqlitePool,
        favorites: Arc<dyn BucketRepository>,
        cart: Arc<dyn BucketRepository>,
    ) -> Self {
        let seller_repo: Arc<dyn SellerRepository> =
            Arc::new(SqliteSellerRepository::new(db.clone()));
        let pet_repo: Arc<dyn PetRepository> = Arc::new(SqlitePetRepository::new(db.clone()));
        let user_repo = Arc::new(SqliteUserRepository::new(db.clone()));

        Self {
            sellers: SellerService::new(seller_repo.clone(), pet_repo.clone()),
            pets: PetService::new(pet_repo.clone(), seller_repo),
            users: UserService::new(user_repo),
            favorites: BucketService::new(BucketKind::Favorites, favorites, pet_repo.clone()),
            cart: BucketService::new(BucketKind::Cart, cart, pet_repo),
            db,
        }
    }

    pub fn bucket(&self, kind: BucketKind) -> &BucketService {
        match kind {
            BucketKind::Favorites => &self.favorites,
            BucketKind::Cart => &self.cart,
        }
    }
}

impl FromRef<AppState> for SellerService {
    fn from_ref(state: &AppState) -> Self {
        state.sellers.clone()
    }
}

impl FromRef<AppState> for PetService {
    fn from_ref(state: &AppState) -> Self {
        state.pets.clone()
    }
}

impl FromRef<AppState> for UserService {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}
