use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{CreateUserDto, GetUserDto, PendingActivation, UpdateUserDto, User};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>>;
    async fn count_users(&self) -> DomainResult<u64>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_activation_hash(&self, token_hash: &str) -> DomainResult<Option<User>>;

    async fn update_user(&self, id: &str, dto: UpdateUserDto) -> DomainResult<Option<User>>;
    async fn update_user_password(&self, id: &str, new_password_hash: &str) -> DomainResult<()>;
    async fn set_activation(&self, id: &str, activation: PendingActivation) -> DomainResult<()>;
    /// Set the password, mark the account active and clear the activation token.
    async fn activate_user(&self, id: &str, password_hash: &str) -> DomainResult<User>;
    async fn record_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()>;
    async fn delete_user(&self, id: &str) -> DomainResult<()>;
}
