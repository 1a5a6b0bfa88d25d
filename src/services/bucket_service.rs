//! BucketService: a user's favorites or cart.
//!
//! Buckets store bare pet ids in the document store and do not check that
//! the user or pet exists. Listing resolves the ids against the relational
//! store and silently skips pets that have since been deleted.

use std::{collections::HashMap, sync::Arc};

use super::ServiceResult;
use crate::{
    models::{bucket::BucketKind, pet::Pet},
    repositories::{BucketRepository, PetRepository},
};

#[derive(Clone)]
pub struct BucketService {
    kind: BucketKind,
    buckets: Arc<dyn BucketRepository>,
    pets: Arc<dyn PetRepository>,
}

impl BucketService {
    pub fn new(
        kind: BucketKind,
        buckets: Arc<dyn BucketRepository>,
        pets: Arc<dyn PetRepository>,
    ) -> Self {
        Self {
            kind,
            buckets,
            pets,
        }
    }

    /// Check that the backing store answers.
    pub async fn ping(&self) -> ServiceResult<()> {
        Ok(self.buckets.ping().await?)
    }

    /// Append `pet_id`. Adding the same pet twice keeps both entries.
    pub async fn add_pet(&self, user_id: i64, pet_id: i64) -> ServiceResult<()> {
        self.buckets.add_pet(user_id, pet_id).await?;
        tracing::debug!("Added pet {} to {:?} of user {}", pet_id, self.kind, user_id);
        Ok(())
    }

    /// Remove one occurrence of `pet_id`.
    pub async fn remove_pet(&self, user_id: i64, pet_id: i64) -> ServiceResult<()> {
        self.buckets.remove_pet(user_id, pet_id).await?;
        tracing::debug!("Removed pet {} from {:?} of user {}", pet_id, self.kind, user_id);
        Ok(())
    }

    /// Stored ids in insertion order; empty when the user has no document.
    pub async fn pet_ids_for_user(&self, user_id: i64) -> ServiceResult<Vec<i64>> {
        Ok(self
            .buckets
            .find_by_user(user_id)
            .await?
            .map(|doc| doc.pets)
            .unwrap_or_default())
    }

    /// The user's pets in stored order, duplicates included.
    pub async fn list_pets_for_user(&self, user_id: i64) -> ServiceResult<Vec<Pet>> {
        let ids = self.pet_ids_for_user(user_id).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut unique = ids.clone();
        unique.sort_unstable();
        unique.dedup();
        let found: HashMap<i64, Pet> = self
            .pets
            .find_by_ids(&unique)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(ids.iter().filter_map(|id| found.get(id).cloned()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::pet::NewPet,
        repositories::memory::{InMemoryBucketRepository, InMemoryPetRepository},
    };

    async fn setup() -> (BucketService, Arc<InMemoryPetRepository>) {
        let pets = Arc::new(InMemoryPetRepository::new());
        let service = BucketService::new(
            BucketKind::Favorites,
            Arc::new(InMemoryBucketRepository::new()),
            pets.clone(),
        );
        (service, pets)
    }

    async fn pet(pets: &InMemoryPetRepository, name: &str) -> Pet {
        pets.create(NewPet {
            name: name.into(),
            species: "cat".into(),
            breed: None,
            age: 1,
            price: 5.0,
            description: None,
            available: true,
            seller_id: 1,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn unknown_user_has_empty_bucket() {
        let (service, _) = setup().await;
        assert!(service.list_pets_for_user(42).await.unwrap().is_empty());
        assert!(service.pet_ids_for_user(42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn adds_append_and_keep_duplicates() {
        let (service, pets) = setup().await;
        let tom = pet(&pets, "Tom").await;
        let kit = pet(&pets, "Kit").await;

        service.add_pet(1, kit.id).await.unwrap();
        service.add_pet(1, tom.id).await.unwrap();
        service.add_pet(1, kit.id).await.unwrap();

        let names: Vec<String> = service
            .list_pets_for_user(1)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Kit", "Tom", "Kit"]);
    }

    #[tokio::test]
    async fn remove_drops_a_single_occurrence() {
        let (service, pets) = setup().await;
        let tom = pet(&pets, "Tom").await;

        service.add_pet(1, tom.id).await.unwrap();
        service.add_pet(1, tom.id).await.unwrap();
        service.remove_pet(1, tom.id).await.unwrap();

        assert_eq!(service.pet_ids_for_user(1).await.unwrap(), vec![tom.id]);
        service.remove_pet(1, 999).await.unwrap();
        service.remove_pet(2, tom.id).await.unwrap();
    }

    #[tokio::test]
    async fn deleted_pets_are_skipped() {
        let (service, pets) = setup().await;
        let tom = pet(&pets, "Tom").await;
        service.add_pet(1, tom.id).await.unwrap();
        service.add_pet(1, 777).await.unwrap();

        let listed = service.list_pets_for_user(1).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(service.pet_ids_for_user(1).await.unwrap(), vec![tom.id, 777]);
    }
}
