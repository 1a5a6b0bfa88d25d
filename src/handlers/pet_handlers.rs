//! Pet endpoints under `/pets`.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use serde::Deserialize;

use super::{flag, json_body, parse_id, response::Reply};
use crate::{
    errors::AppError,
    models::pet::{CreatePetRequest, Pet, UpdatePetRequest},
    services::PetService,
};

const INVALID_PET_ID: &str = "Invalid pet ID";
const INVALID_SELLER_ID: &str = "Invalid seller ID";

/// Query params accepted by the pet read endpoints. `seller_id` stays a
/// string so a malformed value gets the envelope rather than axum's default
/// rejection.
#[derive(Debug, Default, Deserialize)]
pub struct PetQuery {
    pub include_seller: Option<String>,
    pub seller_id: Option<String>,
}

/// `GET /pets?include_seller=bool&seller_id=int`
pub async fn list_pets(
    State(service): State<PetService>,
    Query(q): Query<PetQuery>,
) -> Result<Reply<Vec<Pet>>, AppError> {
    let seller_id = match q.seller_id.as_deref() {
        Some(raw) if !raw.is_empty() => Some(parse_id(raw, INVALID_SELLER_ID)?),
        _ => None,
    };
    let pets = service
        .list_pets(flag(q.include_seller.as_deref()), seller_id)
        .await?;
    Ok(Reply::ok(pets))
}

/// `GET /pets/{id}?include_seller=bool`
pub async fn get_pet(
    State(service): State<PetService>,
    Path(raw_id): Path<String>,
    Query(q): Query<PetQuery>,
) -> Result<Reply<Pet>, AppError> {
    let id = parse_id(&raw_id, INVALID_PET_ID)?;
    let pet = service
        .get_pet(id, flag(q.include_seller.as_deref()))
        .await?;
    Ok(Reply::ok(pet))
}

/// `POST /pets`
pub async fn create_pet(
    State(service): State<PetService>,
    payload: Result<Json<CreatePetRequest>, JsonRejection>,
) -> Result<Reply<Pet>, AppError> {
    let req = json_body(payload)?;
    let pet = service.create_pet(req).await?;
    Ok(Reply::created(pet, "Pet created successfully"))
}

/// `PUT /pets/{id}`
pub async fn update_pet(
    State(service): State<PetService>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdatePetRequest>, JsonRejection>,
) -> Result<Reply<Pet>, AppError> {
    let id = parse_id(&raw_id, INVALID_PET_ID)?;
    let req = json_body(payload)?;
    let pet = service.update_pet(id, req).await?;
    Ok(Reply::updated(pet, "Pet updated successfully"))
}

/// `DELETE /pets/{id}`
pub async fn delete_pet(
    State(service): State<PetService>,
    Path(raw_id): Path<String>,
) -> Result<Reply<()>, AppError> {
    let id = parse_id(&raw_id, INVALID_PET_ID)?;
    service.delete_pet(id).await?;
    Ok(Reply::message("Pet deleted successfully"))
}
