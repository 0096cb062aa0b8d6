use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::domain::{AuditEntry, AuditRepository, DomainError, DomainResult, NewAuditEntry};
use crate::infrastructure::database::entities::audit_log;

pub struct SeaOrmAuditRepository {
    db: DatabaseConnection,
}

impl SeaOrmAuditRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Infra(e.into())
}

fn to_domain(model: audit_log::Model) -> AuditEntry {
    AuditEntry {
        id: model.id,
        tenant_id: model.tenant_id,
        actor_id: model.actor_id,
        action: model.action,
        details: serde_json::from_str(&model.details).unwrap_or(serde_json::Value::Null),
        created_at: model.created_at,
    }
}

#[async_trait]
impl AuditRepository for SeaOrmAuditRepository {
    async fn record(&self, entry: NewAuditEntry) -> DomainResult<AuditEntry> {
        let details = serde_json::to_string(&entry.details).map_err(|e| DomainError::Infra(e.into()))?;

        let active = audit_log::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            tenant_id: Set(entry.tenant_id),
            actor_id: Set(entry.actor_id),
            action: Set(entry.action),
            details: Set(details),
            created_at: Set(Utc::now()),
        };
        let model = active.insert(&self.db).await.map_err(db_err)?;
        Ok(to_domain(model))
    }

    async fn list_for_tenant(&self, tenant_id: &str, limit: u64) -> DomainResult<Vec<AuditEntry>> {
        let models = audit_log::Entity::find()
            .filter(audit_log::Column::TenantId.eq(tenant_id))
            .order_by_desc(audit_log::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(to_domain).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audit::ACTION_CANCEL_SIGNING;
    use crate::infrastructure::database::testing::memory_db;
    use serde_json::json;

    #[tokio::test]
    async fn records_and_lists_per_tenant() {
        let repo = SeaOrmAuditRepository::new(memory_db().await);
        repo.record(
            NewAuditEntry::new(ACTION_CANCEL_SIGNING, json!({"documentId": "doc-1"}))
                .tenant("acme")
                .actor("u-1"),
        )
        .await
        .unwrap();
        repo.record(NewAuditEntry::new(ACTION_CANCEL_SIGNING, json!({})).tenant("globex"))
            .await
            .unwrap();

        let entries = repo.list_for_tenant("acme", 10).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].details["documentId"], "doc-1");
        assert_eq!(entries[0].actor_id.as_deref(), Some("u-1"));
    }
}
