//! Favorites and cart endpoints under `/users/{id}/favorites` and
//! `/users/{id}/cart`. Both share one implementation parameterised by
//! `BucketKind`.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use super::{json_body, parse_id, response::Reply, user_handlers::INVALID_USER_ID};
use crate::{
    errors::AppError,
    models::{
        bucket::{AddPetRequest, BucketKind},
        pet::Pet,
    },
    state::AppState,
};

const INVALID_PET_ID: &str = "Invalid pet ID";

async fn list(state: &AppState, kind: BucketKind, raw_user: &str) -> Result<Reply<Vec<Pet>>, AppError> {
    let user_id = parse_id(raw_user, INVALID_USER_ID)?;
    let pets = state.bucket(kind).list_pets_for_user(user_id).await?;
    Ok(Reply::ok(pets))
}

async fn add(
    state: &AppState,
    kind: BucketKind,
    raw_user: &str,
    payload: Result<Json<AddPetRequest>, JsonRejection>,
) -> Result<Reply<Vec<i64>>, AppError> {
    let user_id = parse_id(raw_user, INVALID_USER_ID)?;
    let req = json_body(payload)?;
    let bucket = state.bucket(kind);
    bucket.add_pet(user_id, req.pet_id).await?;
    let ids = bucket.pet_ids_for_user(user_id).await?;
    Ok(Reply::created(
        ids,
        format!("Pet added to {}", kind.collection()),
    ))
}

async fn remove(
    state: &AppState,
    kind: BucketKind,
    raw_user: &str,
    raw_pet: &str,
) -> Result<Reply<()>, AppError> {
    let user_id = parse_id(raw_user, INVALID_USER_ID)?;
    let pet_id = parse_id(raw_pet, INVALID_PET_ID)?;
    state.bucket(kind).remove_pet(user_id, pet_id).await?;
    Ok(Reply::message(format!(
        "Pet removed from {}",
        kind.collection()
    )))
}

/// `GET /users/{id}/favorites`
pub async fn list_favorites(
    State(state): State<AppState>,
    Path(raw_user): Path<String>,
) -> Result<Reply<Vec<Pet>>, AppError> {
    list(&state, BucketKind::Favorites, &raw_user).await
}

/// `POST /users/{id}/favorites` with `{ "pet_id": n }`
pub async fn add_favorite(
    State(state): State<AppState>,
    Path(raw_user): Path<String>,
    payload: Result<Json<AddPetRequest>, JsonRejection>,
) -> Result<Reply<Vec<i64>>, AppError> {
    add(&state, BucketKind::Favorites, &raw_user, payload).await
}

/// `DELETE /users/{id}/favorites/{pet_id}`
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path((raw_user, raw_pet)): Path<(String, String)>,
) -> Result<Reply<()>, AppError> {
    remove(&state, BucketKind::Favorites, &raw_user, &raw_pet).await
}

/// `GET /users/{id}/cart`
pub async fn list_cart(
    State(state): State<AppState>,
    Path(raw_user): Path<String>,
) -> Result<Reply<Vec<Pet>>, AppError> {
    list(&state, BucketKind::Cart, &raw_user).await
}

/// `POST /users/{id}/cart` with `{ "pet_id": n }`
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(raw_user): Path<String>,
    payload: Result<Json<AddPetRequest>, JsonRejection>,
) -> Result<Reply<Vec<i64>>, AppError> {
    add(&state, BucketKind::Cart, &raw_user, payload).await
}

/// `DELETE /users/{id}/cart/{pet_id}`
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path((raw_user, raw_pet)): Path<(String, String)>,
) -> Result<Reply<()>, AppError> {
    remove(&state, BucketKind::Cart, &raw_user, &raw_pet).await
}
