//! User (buyer) endpoints under `/users`.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use super::{json_body, parse_id, response::Reply};
use crate::{
    errors::AppError,
    models::user::{CreateUserRequest, UpdateUserRequest, User},
    services::UserService,
};

pub(crate) const INVALID_USER_ID: &str = "Invalid user ID";

pub async fn list_users(State(service): State<UserService>) -> Result<Reply<Vec<User>>, AppError> {
    Ok(Reply::ok(service.list_users().await?))
}

pub async fn get_user(
    State(service): State<UserService>,
    Path(raw_id): Path<String>,
) -> Result<Reply<User>, AppError> {
    let id = parse_id(&raw_id, INVALID_USER_ID)?;
    Ok(Reply::ok(service.get_user(id).await?))
}

pub async fn create_user(
    State(service): State<UserService>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Reply<User>, AppError> {
    let req = json_body(payload)?;
    let user = service.create_user(req).await?;
    Ok(Reply::created(user, "User created successfully"))
}

pub async fn update_user(
    State(service): State<UserService>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Reply<User>, AppError> {
    let id = parse_id(&raw_id, INVALID_USER_ID)?;
    let req = json_body(payload)?;
    let user = service.update_user(id, req).await?;
    Ok(Reply::updated(user, "User updated successfully"))
}

pub async fn delete_user(
    State(service): State<UserService>,
    Path(raw_id): Path<String>,
) -> Result<Reply<()>, AppError> {
    let id = parse_id(&raw_id, INVALID_USER_ID)?;
    service.delete_user(id).await?;
    Ok(Reply::message("User deleted successfully"))
}
