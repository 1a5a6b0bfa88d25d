//! PetService: pet CRUD. Every pet must point at an existing seller when it
//! is created and whenever it is reassigned.

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;

use super::{
    PET_NOT_FOUND, SELLER_NOT_FOUND, ServiceError, ServiceResult, is_blank, merge_optional,
    merge_string, optional, trimmed,
};
use crate::{
    models::pet::{CreatePetRequest, NewPet, Pet, UpdatePetRequest},
    repositories::{PetRepository, SellerRepository},
};

#[derive(Clone)]
pub struct PetService {
    pets: Arc<dyn PetRepository>,
    sellers: Arc<dyn SellerRepository>,
}

impl PetService {
    pub fn new(pets: Arc<dyn PetRepository>, sellers: Arc<dyn SellerRepository>) -> Self {
        Self { pets, sellers }
    }

    /// All pets, or only those owned by `seller_id`. With `include_seller`
    /// each pet embeds its owner.
    pub async fn list_pets(
        &self,
        include_seller: bool,
        seller_id: Option<i64>,
    ) -> ServiceResult<Vec<Pet>> {
        let mut pets = self.pets.list(seller_id).await?;
        if include_seller && !pets.is_empty() {
            let sellers: HashMap<_, _> = self
                .sellers
                .list()
                .await?
                .into_iter()
                .map(|s| (s.id, s))
                .collect();
            for pet in &mut pets {
                pet.seller = sellers.get(&pet.seller_id).cloned().map(Box::new);
            }
        }
        Ok(pets)
    }

    pub async fn get_pet(&self, id: i64, include_seller: bool) -> ServiceResult<Pet> {
        let mut pet = self.find(id).await?;
        if include_seller {
            pet.seller = self.sellers.find_by_id(pet.seller_id).await?.map(Box::new);
        }
        Ok(pet)
    }

    /// Create a pet for an existing seller. Nothing is written when the
    /// seller is missing.
    pub async fn create_pet(&self, req: CreatePetRequest) -> ServiceResult<Pet> {
        if is_blank(&req.name) || is_blank(&req.species) || req.seller_id == 0 {
            return Err(ServiceError::invalid(
                "name, species, and seller_id are required",
            ));
        }
        if req.age < 0 || req.price < 0.0 {
            return Err(ServiceError::invalid("age and price must be non-negative"));
        }

        self.ensure_seller_exists(req.seller_id).await?;

        let pet = self
            .pets
            .create(NewPet {
                name: trimmed(req.name),
                species: trimmed(req.species),
                breed: optional(req.breed),
                age: req.age,
                price: req.price,
                description: optional(req.description),
                available: req.available,
                seller_id: req.seller_id,
            })
            .await?;

        tracing::info!("Created pet {} for seller {}", pet.id, pet.seller_id);
        Ok(pet)
    }

    /// Merge the supplied fields of `req` into the stored pet.
    ///
    /// Numeric fields only overwrite when strictly positive, so this cannot
    /// set `age` or `price` back to zero.
    pub async fn update_pet(&self, id: i64, req: UpdatePetRequest) -> ServiceResult<Pet> {
        let mut pet = self.find(id).await?;

        merge_string(&mut pet.name, req.name);
        merge_string(&mut pet.species, req.species);
        merge_optional(&mut pet.breed, req.breed);
        merge_optional(&mut pet.description, req.description);
        if req.age > 0 {
            pet.age = req.age;
        }
        if req.price > 0.0 {
            pet.price = req.price;
        }
        if let Some(available) = req.available {
            pet.available = available;
        }
        if req.seller_id > 0 && req.seller_id != pet.seller_id {
            self.ensure_seller_exists(req.seller_id).await?;
            tracing::debug!(
                "Reassigning pet {} from seller {} to {}",
                pet.id,
                pet.seller_id,
                req.seller_id
            );
            pet.seller_id = req.seller_id;
        }
        pet.updated_at = Utc::now();

        let updated = self
            .pets
            .update(&pet)
            .await?
            .ok_or_else(|| ServiceError::not_found(PET_NOT_FOUND))?;

        tracing::info!("Updated pet {}", updated.id);
        Ok(updated)
    }

    pub async fn delete_pet(&self, id: i64) -> ServiceResult<()> {
        self.find(id).await?;
        if !self.pets.delete(id).await? {
            return Err(ServiceError::not_found(PET_NOT_FOUND));
        }
        tracing::info!("Deleted pet {}", id);
        Ok(())
    }

    async fn find(&self, id: i64) -> ServiceResult<Pet> {
        self.pets
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(PET_NOT_FOUND))
    }

    async fn ensure_seller_exists(&self, seller_id: i64) -> ServiceResult<()> {
        match self.sellers.find_by_id(seller_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found(SELLER_NOT_FOUND)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::seller::NewSeller,
        repositories::memory::{InMemoryPetRepository, InMemorySellerRepository},
    };

    struct Fixture {
        service: PetService,
        pets: Arc<InMemoryPetRepository>,
        ana: i64,
        bia: i64,
    }

    async fn fixture() -> Fixture {
        let sellers = Arc::new(InMemorySellerRepository::new());
        let pets = Arc::new(InMemoryPetRepository::new());
        let mut ids = Vec::new();
        for (name, email) in [("Ana", "ana@x.com"), ("Bia", "bia@x.com")] {
            let seller = sellers
                .create(NewSeller {
                    name: name.into(),
                    email: email.into(),
                    phone: None,
                    address: None,
                })
                .await
                .unwrap();
            ids.push(seller.id);
        }
        Fixture {
            service: PetService::new(pets.clone(), sellers),
            pets,
            ana: ids[0],
            bia: ids[1],
        }
    }

    fn rex(seller_id: i64) -> CreatePetRequest {
        CreatePetRequest {
            name: "Rex".into(),
            species: "dog".into(),
            breed: "Beagle".into(),
            age: 3,
            price: 250.0,
            description: "Friendly".into(),
            available: true,
            seller_id,
        }
    }

    #[tokio::test]
    async fn create_rejects_missing_required_fields() {
        let f = fixture().await;
        for req in [
            CreatePetRequest { name: String::new(), ..rex(f.ana) },
            CreatePetRequest { species: String::new(), ..rex(f.ana) },
            CreatePetRequest { seller_id: 0, ..rex(f.ana) },
        ] {
            let err = f.service.create_pet(req).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn create_rejects_negative_numbers() {
        let f = fixture().await;
        let err = f
            .service
            .create_pet(CreatePetRequest { age: -1, ..rex(f.ana) })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn create_with_unknown_seller_persists_nothing() {
        let f = fixture().await;
        let err = f.service.create_pet(rex(999)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == SELLER_NOT_FOUND));
        assert!(f.pets.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_keeps_zero_price_and_age() {
        let f = fixture().await;
        let pet = f
            .service
            .create_pet(CreatePetRequest { age: 0, price: 0.0, ..rex(f.ana) })
            .await
            .unwrap();
        assert_eq!(pet.age, 0);
        assert_eq!(pet.price, 0.0);
    }

    #[tokio::test]
    async fn list_filters_by_seller_and_embeds_owner() {
        let f = fixture().await;
        f.service.create_pet(rex(f.ana)).await.unwrap();
        f.service
            .create_pet(CreatePetRequest { name: "Tom".into(), ..rex(f.bia) })
            .await
            .unwrap();
        f.service
            .create_pet(CreatePetRequest { name: "Max".into(), ..rex(f.ana) })
            .await
            .unwrap();

        let owned = f.service.list_pets(false, Some(f.ana)).await.unwrap();
        assert_eq!(owned.len(), 2);
        assert!(owned.iter().all(|p| p.seller_id == f.ana && p.seller.is_none()));

        let embedded = f.service.list_pets(true, Some(f.bia)).await.unwrap();
        assert_eq!(embedded.len(), 1);
        assert_eq!(embedded[0].seller.as_ref().map(|s| s.id), Some(f.bia));

        assert_eq!(f.service.list_pets(false, None).await.unwrap().len(), 3);
        assert!(f.service.list_pets(false, Some(12345)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_with_seller_embeds_owner() {
        let f = fixture().await;
        let pet = f.service.create_pet(rex(f.ana)).await.unwrap();
        let loaded = f.service.get_pet(pet.id, true).await.unwrap();
        assert_eq!(loaded.seller.map(|s| s.name), Some("Ana".to_string()));

        let err = f.service.get_pet(pet.id + 1, false).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == PET_NOT_FOUND));
    }

    #[tokio::test]
    async fn update_name_only_leaves_everything_else() {
        let f = fixture().await;
        let pet = f.service.create_pet(rex(f.ana)).await.unwrap();

        let req = UpdatePetRequest {
            name: "Rex II".into(),
            ..Default::default()
        };
        let updated = f.service.update_pet(pet.id, req).await.unwrap();

        assert_eq!(updated.name, "Rex II");
        assert_eq!(updated.species, pet.species);
        assert_eq!(updated.breed, pet.breed);
        assert_eq!(updated.age, pet.age);
        assert_eq!(updated.price, pet.price);
        assert_eq!(updated.description, pet.description);
        assert_eq!(updated.available, pet.available);
        assert_eq!(updated.seller_id, pet.seller_id);
    }

    #[tokio::test]
    async fn update_ignores_zero_numbers() {
        let f = fixture().await;
        let pet = f.service.create_pet(rex(f.ana)).await.unwrap();

        let req = UpdatePetRequest {
            age: 0,
            price: 0.0,
            available: Some(false),
            ..Default::default()
        };
        let updated = f.service.update_pet(pet.id, req).await.unwrap();

        assert_eq!(updated.age, 3);
        assert_eq!(updated.price, 250.0);
        assert!(!updated.available);
    }

    #[tokio::test]
    async fn repeated_update_is_idempotent() {
        let f = fixture().await;
        let pet = f.service.create_pet(rex(f.ana)).await.unwrap();
        let req = UpdatePetRequest {
            species: "cat".into(),
            price: 99.5,
            ..Default::default()
        };

        let first = f.service.update_pet(pet.id, req.clone()).await.unwrap();
        let second = f.service.update_pet(pet.id, req).await.unwrap();

        assert_eq!(
            (first.name, first.species, first.price, first.age, first.seller_id),
            (second.name, second.species, second.price, second.age, second.seller_id)
        );
    }

    #[tokio::test]
    async fn reassignment_requires_existing_seller() {
        let f = fixture().await;
        let pet = f.service.create_pet(rex(f.ana)).await.unwrap();

        let err = f
            .service
            .update_pet(pet.id, UpdatePetRequest { seller_id: 999, ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == SELLER_NOT_FOUND));
        assert_eq!(f.pets.find_by_id(pet.id).await.unwrap().unwrap().seller_id, f.ana);

        let moved = f
            .service
            .update_pet(pet.id, UpdatePetRequest { seller_id: f.bia, ..Default::default() })
            .await
            .unwrap();
        assert_eq!(moved.seller_id, f.bia);
    }

    #[tokio::test]
    async fn delete_removes_pet_once() {
        let f = fixture().await;
        let pet = f.service.create_pet(rex(f.ana)).await.unwrap();

        f.service.delete_pet(pet.id).await.unwrap();
        let err = f.service.delete_pet(pet.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
