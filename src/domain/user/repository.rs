use async_trait::async_trait;

use super::filters::UserFilters;
use super::model::{UserAccount, UserItem, UserRole, UserStatus};
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

/// Paged directory query
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub filters: UserFilters,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub tenant_id: String,
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub company: Option<String>,
    pub department: Option<String>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list_users(&self, tenant_id: &str, query: UserQuery)
        -> DomainResult<PaginatedResult<UserItem>>;

    /// Every user of the tenant matching `filters`, newest first
    async fn list_all(&self, tenant_id: &str, filters: &UserFilters) -> DomainResult<Vec<UserItem>>;

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> DomainResult<Option<UserItem>>;
    async fn find_account_by_email(&self, email: &str) -> DomainResult<Option<UserAccount>>;

    /// Returns `None` when the user does not exist in the tenant
    async fn update_role(
        &self,
        tenant_id: &str,
        id: &str,
        role: UserRole,
    ) -> DomainResult<Option<UserItem>>;

    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<UserItem>;
    async fn count(&self) -> DomainResult<u64>;
}
