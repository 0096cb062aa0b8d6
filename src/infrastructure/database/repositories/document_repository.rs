use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::domain::{Document, DocumentRepository, DomainError, DomainResult};
use crate::infrastructure::database::entities::document;

pub struct SeaOrmDocumentRepository {
    db: DatabaseConnection,
}

impl SeaOrmDocumentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Infra(e.into())
}

#[async_trait]
impl DocumentRepository for SeaOrmDocumentRepository {
    async fn find_for_tenant(&self, id: &str, tenant_id: &str) -> DomainResult<Option<Document>> {
        let model = document::Entity::find_by_id(id)
            .filter(document::Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(Document::from))
    }

    async fn save(&self, doc: Document) -> DomainResult<Document> {
        let active = document::ActiveModel {
            id: Set(doc.id),
            tenant_id: Set(doc.tenant_id),
            name: Set(doc.name),
            content_type: Set(doc.content_type),
            size_bytes: Set(doc.size_bytes),
            uploaded_by: Set(doc.uploaded_by),
            created_at: Set(doc.created_at),
        };
        let model = active.insert(&self.db).await.map_err(db_err)?;
        Ok(model.into())
    }
}
