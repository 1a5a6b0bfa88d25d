//! In-memory repositories for tests.
//!
//! They mirror the store implementations closely enough for the service
//! layer: ids are assigned sequentially from 1, lists are ordered by id and
//! seller/user emails are unique.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{
    BucketRepository, PetRepository, RepositoryError, RepositoryResult, SellerRepository,
    UserRepository,
};
use crate::models::{
    bucket::BucketDocument,
    pet::{NewPet, Pet},
    seller::{NewSeller, Seller},
    user::{NewUser, User},
};

struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Default)]
pub struct InMemorySellerRepository {
    table: Mutex<Table<Seller>>,
}

impl InMemorySellerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SellerRepository for InMemorySellerRepository {
    async fn list(&self) -> RepositoryResult<Vec<Seller>> {
        Ok(self.table.lock().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Seller>> {
        Ok(self.table.lock().await.rows.get(&id).cloned())
    }

    async fn create(&self, seller: NewSeller) -> RepositoryResult<Seller> {
        let mut table = self.table.lock().await;
        if table.rows.values().any(|s| s.email == seller.email) {
            return Err(RepositoryError::Duplicate(seller.email));
        }
        let now = Utc::now();
        let id = table.allocate_id();
        let created = Seller {
            id,
            name: seller.name,
            email: seller.email,
            phone: seller.phone,
            address: seller.address,
            created_at: now,
            updated_at: now,
            pets: None,
        };
        table.rows.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, seller: &Seller) -> RepositoryResult<Option<Seller>> {
        let mut table = self.table.lock().await;
        if table
            .rows
            .values()
            .any(|s| s.id != seller.id && s.email == seller.email)
        {
            return Err(RepositoryError::Duplicate(seller.email.clone()));
        }
        let Some(row) = table.rows.get_mut(&seller.id) else {
            return Ok(None);
        };
        *row = Seller {
            pets: None,
            created_at: row.created_at,
            ..seller.clone()
        };
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.table.lock().await.rows.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryPetRepository {
    table: Mutex<Table<Pet>>,
}

impl InMemoryPetRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PetRepository for InMemoryPetRepository {
    async fn list(&self, seller_id: Option<i64>) -> RepositoryResult<Vec<Pet>> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .filter(|p| seller_id.is_none_or(|id| p.seller_id == id))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Pet>> {
        Ok(self.table.lock().await.rows.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> RepositoryResult<Vec<Pet>> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn create(&self, pet: NewPet) -> RepositoryResult<Pet> {
        let mut table = self.table.lock().await;
        let now = Utc::now();
        let id = table.allocate_id();
        let created = Pet {
            id,
            name: pet.name,
            species: pet.species,
            breed: pet.breed,
            age: pet.age,
            price: pet.price,
            description: pet.description,
            available: pet.available,
            seller_id: pet.seller_id,
            created_at: now,
            updated_at: now,
            seller: None,
        };
        table.rows.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, pet: &Pet) -> RepositoryResult<Option<Pet>> {
        let mut table = self.table.lock().await;
        let Some(row) = table.rows.get_mut(&pet.id) else {
            return Ok(None);
        };
        *row = Pet {
            seller: None,
            created_at: row.created_at,
            ..pet.clone()
        };
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.table.lock().await.rows.remove(&id).is_some())
    }

    async fn count_by_seller(&self, seller_id: i64) -> RepositoryResult<i64> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .filter(|p| p.seller_id == seller_id)
            .count() as i64)
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    table: Mutex<Table<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> RepositoryResult<Vec<User>> {
        Ok(self.table.lock().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        Ok(self.table.lock().await.rows.get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> RepositoryResult<User> {
        let mut table = self.table.lock().await;
        if table.rows.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::Duplicate(user.email));
        }
        let now = Utc::now();
        let id = table.allocate_id();
        let created = User {
            id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            address: user.address,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, user: &User) -> RepositoryResult<Option<User>> {
        let mut table = self.table.lock().await;
        if table
            .rows
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(RepositoryError::Duplicate(user.email.clone()));
        }
        let Some(row) = table.rows.get_mut(&user.id) else {
            return Ok(None);
        };
        *row = User {
            created_at: row.created_at,
            ..user.clone()
        };
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.table.lock().await.rows.remove(&id).is_some())
    }
}

/// Bucket documents keyed by user id.
#[derive(Default)]
pub struct InMemoryBucketRepository {
    docs: Mutex<HashMap<i64, Vec<i64>>>,
}

impl InMemoryBucketRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BucketRepository for InMemoryBucketRepository {
    async fn add_pet(&self, user_id: i64, pet_id: i64) -> RepositoryResult<()> {
        self.docs
            .lock()
            .await
            .entry(user_id)
            .or_default()
            .push(pet_id);
        Ok(())
    }

    async fn remove_pet(&self, user_id: i64, pet_id: i64) -> RepositoryResult<()> {
        let mut docs = self.docs.lock().await;
        if let Some(pets) = docs.get_mut(&user_id) {
            if let Some(pos) = pets.iter().position(|p| *p == pet_id) {
                pets.remove(pos);
            }
        }
        Ok(())
    }

    async fn find_by_user(&self, user_id: i64) -> RepositoryResult<Option<BucketDocument>> {
        Ok(self
            .docs
            .lock()
            .await
            .get(&user_id)
            .map(|pets| BucketDocument {
                user_id,
                pets: pets.clone(),
            }))
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
