use async_trait::async_trait;

use super::{CreateUserDto, GetUserDto, User, UserRole};
use crate::shared::{DomainResult, PaginatedResult};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn get_users_by_ids(&self, ids: &[String]) -> DomainResult<Vec<User>>;
    async fn list_users(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<User>>;
    async fn list_active_by_role(&self, role: UserRole) -> DomainResult<Vec<User>>;
    async fn count_users(&self) -> DomainResult<u64>;

    async fn set_active(&self, id: &str, is_active: bool) -> DomainResult<Option<User>>;
    async fn update_password(&self, id: &str, new_password_hash: &str) -> DomainResult<()>;
    async fn record_login(&self, id: &str) -> DomainResult<()>;
}
