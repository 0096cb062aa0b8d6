use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, UserAccount, UserFilters, UserItem, UserQuery,
    UserRepository, UserRole, UserStatus,
};
use crate::infrastructure::database::entities::user;
use crate::shared::PaginatedResult;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Infra(e.into())
}

/// Tenant scope plus every active filter, newest first
fn directory_query(tenant_id: &str, filters: &UserFilters) -> Select<user::Entity> {
    let mut query = user::Entity::find().filter(user::Column::TenantId.eq(tenant_id));

    if let Some(term) = filters.search_term() {
        query = query.filter(
            Condition::any()
                .add(user::Column::Name.contains(term))
                .add(user::Column::Email.contains(term)),
        );
    }

    if let Some(role) = filters.role {
        query = query.filter(user::Column::Role.eq(user::Role::from(role)));
    }

    if let Some(status) = filters.status {
        let matches = user::Column::Status.eq(user::Status::from(status));
        // A missing status counts as active
        query = if status == UserStatus::Active {
            query.filter(
                Condition::any()
                    .add(matches)
                    .add(user::Column::Status.is_null()),
            )
        } else {
            query.filter(matches)
        };
    }

    if let Some(department) = &filters.department {
        query = query.filter(user::Column::Department.like(department.as_str()));
    }

    if let Some(since) = filters.date_range.since(Utc::now()) {
        query = query.filter(user::Column::CreatedAt.gte(since));
    }

    query
        .order_by_desc(user::Column::CreatedAt)
        .order_by_asc(user::Column::Id)
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn list_users(&self, tenant_id: &str, query: UserQuery) -> DomainResult<PaginatedResult<UserItem>> {
        let page = query.page.max(1);
        let page_size = query.page_size.clamp(1, 100);
        let select = directory_query(tenant_id, &query.filters);

        let total = select.clone().count(&self.db).await.map_err(db_err)?;

        let offset = u64::from(page - 1) * u64::from(page_size);
        let models = select
            .offset(offset)
            .limit(u64::from(page_size))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let items = models.into_iter().map(UserItem::from).collect();
        Ok(PaginatedResult::new(items, total, page, page_size))
    }

    async fn list_all(&self, tenant_id: &str, filters: &UserFilters) -> DomainResult<Vec<UserItem>> {
        let models = directory_query(tenant_id, filters)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(UserItem::from).collect())
    }

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> DomainResult<Option<UserItem>> {
        let model = user::Entity::find_by_id(id)
            .filter(user::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(UserItem::from))
    }

    async fn find_account_by_email(&self, email: &str) -> DomainResult<Option<UserAccount>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(|m| {
            let password_hash = m.password_hash.clone();
            UserAccount {
                user: m.into(),
                password_hash,
            }
        }))
    }

    async fn update_role(&self, tenant_id: &str, id: &str, role: UserRole) -> DomainResult<Option<UserItem>> {
        let existing = user::Entity::find_by_id(id)
            .filter(user::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();
        active.role = Set(role.into());
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await.map_err(db_err)?;
        Ok(Some(updated.into()))
    }

    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<UserItem> {
        let now = Utc::now();

        let new_user = user::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            tenant_id: Set(dto.tenant_id),
            name: Set(dto.name),
            email: Set(dto.email.trim().to_lowercase()),
            password_hash: Set(dto.password_hash),
            role: Set(dto.role.into()),
            status: Set(Some(dto.status.into())),
            company: Set(dto.company),
            department: Set(dto.department),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = new_user.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") || e.to_string().contains("duplicate") {
                DomainError::Conflict("Email already exists".to_string())
            } else {
                db_err(e)
            }
        })?;

        Ok(model.into())
    }

    async fn count(&self) -> DomainResult<u64> {
        user::Entity::find().count(&self.db).await.map_err(db_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::testing::memory_db;

    fn dto(tenant: &str, name: &str, role: UserRole, department: Option<&str>) -> CreateUserDto {
        CreateUserDto {
            tenant_id: tenant.into(),
            name: Some(name.into()),
            email: format!("{}@{tenant}.io", name.to_lowercase()),
            password_hash: "hash".into(),
            role,
            status: UserStatus::Active,
            company: None,
            department: department.map(String::from),
        }
    }

    async fn seeded() -> SeaOrmUserRepository {
        let repo = SeaOrmUserRepository::new(memory_db().await);
        repo.create_user(dto("acme", "Ann", UserRole::Client, Some("Sales"))).await.unwrap();
        repo.create_user(dto("acme", "Bob", UserRole::Staff, Some("Ops"))).await.unwrap();
        repo.create_user(dto("acme", "Cyd", UserRole::Admin, None)).await.unwrap();
        repo.create_user(dto("globex", "Dee", UserRole::Client, None)).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn list_is_tenant_scoped_and_paginated() {
        let repo = seeded().await;
        let page = repo
            .list_users(
                "acme",
                UserQuery {
                    filters: UserFilters::default(),
                    page: 1,
                    page_size: 2,
                },
            )
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn page_far_past_the_end_is_empty() {
        let repo = seeded().await;
        let page = repo
            .list_users(
                "acme",
                UserQuery {
                    filters: UserFilters::default(),
                    page: u32::MAX,
                    page_size: 100,
                },
            )
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert!(page.items.is_empty());
        assert_eq!(page.page, u32::MAX);
    }

    #[tokio::test]
    async fn filters_apply_in_sql() {
        let repo = seeded().await;

        let search = UserFilters {
            search: "BOB".into(),
            ..UserFilters::default()
        };
        let found = repo.list_all("acme", &search).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name.as_deref(), Some("Bob"));

        let admins = repo
            .list_all("acme", &UserFilters::with_role(Some(UserRole::Admin)))
            .await
            .unwrap();
        assert_eq!(admins.len(), 1);

        let ops = UserFilters {
            department: Some("ops".into()),
            ..UserFilters::default()
        };
        assert_eq!(repo.list_all("acme", &ops).await.unwrap().len(), 1);

        let suspended = UserFilters {
            status: Some(UserStatus::Suspended),
            ..UserFilters::default()
        };
        assert!(repo.list_all("acme", &suspended).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_role_respects_tenant() {
        let repo = seeded().await;
        let dee = repo.list_all("globex", &UserFilters::default()).await.unwrap();
        let dee_id = dee[0].id.clone();

        assert!(repo
            .update_role("acme", &dee_id, UserRole::Admin)
            .await
            .unwrap()
            .is_none());

        let updated = repo
            .update_role("globex", &dee_id, UserRole::Staff)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.role, UserRole::Staff);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let repo = seeded().await;
        let err = repo
            .create_user(dto("acme", "Ann", UserRole::Client, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn account_lookup_by_email() {
        let repo = seeded().await;
        let account = repo.find_account_by_email("Ann@acme.io").await.unwrap().unwrap();
        assert_eq!(account.password_hash, "hash");
        assert_eq!(repo.count().await.unwrap(), 4);
    }
}
