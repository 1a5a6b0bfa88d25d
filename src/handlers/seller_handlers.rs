//! Seller endpoints under `/sellers`.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use serde::Deserialize;

use super::{flag, json_body, parse_id, response::Reply};
use crate::{
    errors::AppError,
    models::seller::{CreateSellerRequest, Seller, UpdateSellerRequest},
    services::SellerService,
};

const INVALID_SELLER_ID: &str = "Invalid seller ID";

#[derive(Debug, Default, Deserialize)]
pub struct SellerQuery {
    pub include_pets: Option<String>,
}

/// `GET /sellers?include_pets=bool`
pub async fn list_sellers(
    State(service): State<SellerService>,
    Query(q): Query<SellerQuery>,
) -> Result<Reply<Vec<Seller>>, AppError> {
    let sellers = service
        .list_sellers(flag(q.include_pets.as_deref()))
        .await?;
    Ok(Reply::ok(sellers))
}

/// `GET /sellers/{id}?include_pets=bool`
pub async fn get_seller(
    State(service): State<SellerService>,
    Path(raw_id): Path<String>,
    Query(q): Query<SellerQuery>,
) -> Result<Reply<Seller>, AppError> {
    let id = parse_id(&raw_id, INVALID_SELLER_ID)?;
    let seller = service
        .get_seller(id, flag(q.include_pets.as_deref()))
        .await?;
    Ok(Reply::ok(seller))
}

/// `POST /sellers`
pub async fn create_seller(
    State(service): State<SellerService>,
    payload: Result<Json<CreateSellerRequest>, JsonRejection>,
) -> Result<Reply<Seller>, AppError> {
    let req = json_body(payload)?;
    let seller = service.create_seller(req).await?;
    Ok(Reply::created(seller, "Seller created successfully"))
}

/// `PUT /sellers/{id}`
pub async fn update_seller(
    State(service): State<SellerService>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateSellerRequest>, JsonRejection>,
) -> Result<Reply<Seller>, AppError> {
    let id = parse_id(&raw_id, INVALID_SELLER_ID)?;
    let req = json_body(payload)?;
    let seller = service.update_seller(id, req).await?;
    Ok(Reply::updated(seller, "Seller updated successfully"))
}

/// `DELETE /sellers/{id}` - refused with 409 while the seller owns pets.
pub async fn delete_seller(
    State(service): State<SellerService>,
    Path(raw_id): Path<String>,
) -> Result<Reply<()>, AppError> {
    let id = parse_id(&raw_id, INVALID_SELLER_ID)?;
    service.delete_seller(id).await?;
    Ok(Reply::message("Seller deleted successfully"))
}
