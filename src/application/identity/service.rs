//! User directory service: application-layer orchestration
//!
//! HTTP handlers stay thin and delegate to this service.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::application::workbench::{OverviewMetrics, QuickStats};
use crate::domain::audit::{record_best_effort, ACTION_ROLE_CHANGED};
use crate::domain::{
    CreateUserDto, DomainError, DomainResult, NewAuditEntry, RepositoryProvider, UserFilters,
    UserItem, UserQuery, UserRole, UserStatus,
};
use crate::infrastructure::crypto::{create_token, hash_password, verify_password, JwtConfig};
use crate::shared::{InfraError, PaginatedResult};

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserItem,
}

/// Authenticated caller acting inside a tenant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub tenant_id: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsersOverview {
    pub metrics: OverviewMetrics,
    pub quick_stats: QuickStats,
}

/// Account created on first start when the database has no users
#[derive(Debug, Clone)]
pub struct DefaultAdmin {
    pub tenant_id: String,
    pub email: String,
    pub password: String,
    pub name: String,
}

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self { repos, jwt_config }
    }

    // ── Authentication ──────────────────────────────────────────

    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let Some(account) = self.repos.users().find_account_by_email(email).await? else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if account.user.effective_status() == UserStatus::Suspended {
            return Err(DomainError::Unauthorized("Account is suspended".into()));
        }

        let valid = verify_password(password, &account.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        let token = create_token(&account.user, &self.jwt_config)
            .map_err(|e| DomainError::Infra(InfraError::Crypto(e.to_string())))?;

        info!(user_id = %account.user.id, tenant_id = %account.user.tenant_id, "User logged in");
        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user: account.user,
        })
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn list_users(&self, tenant_id: &str, query: UserQuery) -> DomainResult<PaginatedResult<UserItem>> {
        self.repos.users().list_users(tenant_id, query).await
    }

    pub async fn get_user(&self, tenant_id: &str, id: &str) -> DomainResult<UserItem> {
        self.repos
            .users()
            .find_by_id(tenant_id, id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", id))
    }

    /// Overview cards plus sidebar quick stats for the whole tenant
    pub async fn overview(&self, tenant_id: &str) -> DomainResult<UsersOverview> {
        let users = self
            .repos
            .users()
            .list_all(tenant_id, &UserFilters::default())
            .await?;
        Ok(UsersOverview {
            metrics: OverviewMetrics::from_users(&users),
            quick_stats: QuickStats::from_users(&users),
        })
    }

    // ── Commands ────────────────────────────────────────────────

    /// Change a user's role inside the actor's tenant. Admins only.
    pub async fn change_role(&self, actor: &Actor, user_id: &str, role: UserRole) -> DomainResult<UserItem> {
        if !actor.role.can_manage_users() {
            return Err(DomainError::Forbidden("Only admins can change user roles".into()));
        }

        let previous = self.get_user(&actor.tenant_id, user_id).await?;
        let updated = self
            .repos
            .users()
            .update_role(&actor.tenant_id, user_id, role)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", user_id))?;

        record_best_effort(
            self.repos.audit(),
            NewAuditEntry::new(
                ACTION_ROLE_CHANGED,
                json!({
                    "userId": user_id,
                    "role": role.as_str(),
                    "previousRole": previous.role.as_str(),
                }),
            )
            .tenant(&actor.tenant_id)
            .actor(&actor.user_id),
        )
        .await;

        info!(user_id, role = %role, actor = %actor.user_id, "User role changed");
        Ok(updated)
    }

    /// Seed an admin when the user table is empty.
    /// Returns the created user, `None` when users already exist.
    pub async fn ensure_default_admin(&self, admin: &DefaultAdmin) -> DomainResult<Option<UserItem>> {
        if self.repos.users().count().await? > 0 {
            return Ok(None);
        }

        let password_hash = hash_password(&admin.password)
            .map_err(|e| DomainError::Infra(InfraError::Crypto(e.to_string())))?;

        let user = self
            .repos
            .users()
            .create_user(CreateUserDto {
                tenant_id: admin.tenant_id.clone(),
                name: Some(admin.name.clone()),
                email: admin.email.clone(),
                password_hash,
                role: UserRole::Admin,
                status: UserStatus::Active,
                company: None,
                department: None,
            })
            .await?;

        warn!(
            email = %admin.email,
            tenant_id = %admin.tenant_id,
            "Created default admin account, change its password"
        );
        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_user, InMemoryRepos};

    fn admin_actor() -> Actor {
        Actor {
            user_id: "admin".into(),
            tenant_id: "acme".into(),
            role: UserRole::Admin,
        }
    }

    fn service() -> (UserService, Arc<InMemoryRepos>) {
        let repos = InMemoryRepos::default();
        repos.add_user(sample_user("u1", "acme", "Ann", UserRole::Client));
        repos.add_user(sample_user("u2", "globex", "Bob", UserRole::Client));
        let repos = Arc::new(repos);
        (UserService::new(repos.clone(), JwtConfig::default()), repos)
    }

    #[tokio::test]
    async fn login_checks_password() {
        let (svc, repos) = service();
        let hash = bcrypt::hash("correct-horse", 4).unwrap();
        repos.add_account(sample_user("u9", "acme", "Zed", UserRole::Admin), hash);

        let result = svc.login("zed@acme.io", "correct-horse").await.unwrap();
        assert_eq!(result.user.id, "u9");
        assert_eq!(result.token_type, "Bearer");

        let err = svc.login("zed@acme.io", "nope").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
        let err = svc.login("ghost@acme.io", "nope").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn change_role_is_tenant_scoped() {
        let (svc, repos) = service();
        let updated = svc.change_role(&admin_actor(), "u1", UserRole::Staff).await.unwrap();
        assert_eq!(updated.role, UserRole::Staff);
        assert_eq!(repos.audit_actions(), vec![ACTION_ROLE_CHANGED.to_string()]);

        let err = svc
            .change_role(&admin_actor(), "u2", UserRole::Staff)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn change_role_requires_admin() {
        let (svc, _) = service();
        let actor = Actor {
            role: UserRole::TeamLead,
            ..admin_actor()
        };
        let err = svc.change_role(&actor, "u1", UserRole::Admin).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn overview_counts_tenant_only() {
        let (svc, _) = service();
        let overview = svc.overview("acme").await.unwrap();
        assert_eq!(overview.metrics.total_users, 1);
        assert_eq!(overview.quick_stats.clients, 1);
    }

    #[tokio::test]
    async fn default_admin_only_on_empty_store() {
        let repos = Arc::new(InMemoryRepos::default());
        let svc = UserService::new(repos.clone(), JwtConfig::default());
        let admin = DefaultAdmin {
            tenant_id: "default".into(),
            email: "admin@example.com".into(),
            password: "admin-pass".into(),
            name: "Administrator".into(),
        };
        assert!(svc.ensure_default_admin(&admin).await.unwrap().is_some());
        assert!(svc.ensure_default_admin(&admin).await.unwrap().is_none());
    }
}
