//! UserService: buyer profiles. Same validation and merge rules as sellers,
//! without the pets relation.

use std::sync::Arc;

use chrono::Utc;

use super::{
    ServiceError, ServiceResult, USER_NOT_FOUND, is_blank, merge_optional, merge_string, optional,
    trimmed,
};
use crate::{
    models::user::{CreateUserRequest, NewUser, UpdateUserRequest, User},
    repositories::UserRepository,
};

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn list_users(&self) -> ServiceResult<Vec<User>> {
        Ok(self.users.list().await?)
    }

    pub async fn get_user(&self, id: i64) -> ServiceResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))
    }

    pub async fn create_user(&self, req: CreateUserRequest) -> ServiceResult<User> {
        if is_blank(&req.name) || is_blank(&req.email) {
            return Err(ServiceError::invalid("name and email are required"));
        }

        let user = self
            .users
            .create(NewUser {
                name: trimmed(req.name),
                email: trimmed(req.email),
                phone: optional(req.phone),
                address: optional(req.address),
            })
            .await
            .map_err(|err| ServiceError::from_write(err, "user"))?;

        tracing::info!("Created user {}", user.id);
        Ok(user)
    }

    pub async fn update_user(&self, id: i64, req: UpdateUserRequest) -> ServiceResult<User> {
        let mut user = self.get_user(id).await?;

        merge_string(&mut user.name, req.name);
        merge_string(&mut user.email, req.email);
        merge_optional(&mut user.phone, req.phone);
        merge_optional(&mut user.address, req.address);
        user.updated_at = Utc::now();

        self.users
            .update(&user)
            .await
            .map_err(|err| ServiceError::from_write(err, "user"))?
            .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))
    }

    pub async fn delete_user(&self, id: i64) -> ServiceResult<()> {
        if !self.users.delete(id).await? {
            return Err(ServiceError::not_found(USER_NOT_FOUND));
        }
        tracing::info!("Deleted user {}", id);
        Ok(())
    }
}
