//! SellerService: seller CRUD plus the rule that a seller who still owns
//! pets cannot be deleted.

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;

use super::{
    SELLER_HAS_PETS, SELLER_NOT_FOUND, ServiceError, ServiceResult, is_blank, merge_optional,
    merge_string, optional, trimmed,
};
use crate::{
    models::{
        pet::Pet,
        seller::{CreateSellerRequest, NewSeller, Seller, UpdateSellerRequest},
    },
    repositories::{PetRepository, SellerRepository},
};

#[derive(Clone)]
pub struct SellerService {
    sellers: Arc<dyn SellerRepository>,
    pets: Arc<dyn PetRepository>,
}

impl SellerService {
    pub fn new(sellers: Arc<dyn SellerRepository>, pets: Arc<dyn PetRepository>) -> Self {
        Self { sellers, pets }
    }

    /// All sellers. With `include_pets`, every seller carries its pets (an
    /// empty list when it owns none).
    pub async fn list_sellers(&self, include_pets: bool) -> ServiceResult<Vec<Seller>> {
        let mut sellers = self.sellers.list().await?;
        if include_pets {
            let mut owned: HashMap<i64, Vec<Pet>> = HashMap::new();
            for pet in self.pets.list(None).await? {
                owned.entry(pet.seller_id).or_default().push(pet);
            }
            for seller in &mut sellers {
                seller.pets = Some(owned.remove(&seller.id).unwrap_or_default());
            }
        }
        Ok(sellers)
    }

    pub async fn get_seller(&self, id: i64, include_pets: bool) -> ServiceResult<Seller> {
        let mut seller = self.find(id).await?;
        if include_pets {
            seller.pets = Some(self.pets.list(Some(id)).await?);
        }
        Ok(seller)
    }

    pub async fn create_seller(&self, req: CreateSellerRequest) -> ServiceResult<Seller> {
        if is_blank(&req.name) || is_blank(&req.email) {
            return Err(ServiceError::invalid("name and email are required"));
        }

        let seller = self
            .sellers
            .create(NewSeller {
                name: trimmed(req.name),
                email: trimmed(req.email),
                phone: optional(req.phone),
                address: optional(req.address),
            })
            .await
            .map_err(|err| ServiceError::from_write(err, "seller"))?;

        tracing::info!("Created seller {} <{}>", seller.id, seller.email);
        Ok(seller)
    }

    /// Merge the non-empty fields of `req` into the stored seller.
    pub async fn update_seller(&self, id: i64, req: UpdateSellerRequest) -> ServiceResult<Seller> {
        let mut seller = self.find(id).await?;

        merge_string(&mut seller.name, req.name);
        merge_string(&mut seller.email, req.email);
        merge_optional(&mut seller.phone, req.phone);
        merge_optional(&mut seller.address, req.address);
        seller.updated_at = Utc::now();

        let updated = self
            .sellers
            .update(&seller)
            .await
            .map_err(|err| ServiceError::from_write(err, "seller"))?
            .ok_or_else(|| ServiceError::not_found(SELLER_NOT_FOUND))?;

        tracing::info!("Updated seller {}", updated.id);
        Ok(updated)
    }

    /// Delete a seller that owns no pets.
    ///
    /// The pet count and the delete are separate statements; a pet created
    /// for this seller in between is rejected by the foreign key instead.
    pub async fn delete_seller(&self, id: i64) -> ServiceResult<()> {
        self.find(id).await?;

        let pet_count = self.pets.count_by_seller(id).await?;
        if pet_count > 0 {
            tracing::warn!("Refusing to delete seller {} owning {} pets", id, pet_count);
            return Err(ServiceError::conflict(SELLER_HAS_PETS));
        }

        if !self.sellers.delete(id).await? {
            return Err(ServiceError::not_found(SELLER_NOT_FOUND));
        }
        tracing::info!("Deleted seller {}", id);
        Ok(())
    }

    async fn find(&self, id: i64) -> ServiceResult<Seller> {
        self.sellers
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(SELLER_NOT_FOUND))
    }
}
