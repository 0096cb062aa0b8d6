use async_trait::async_trait;

use super::model::Document;
use crate::domain::DomainResult;

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// The document only if it belongs to `tenant_id`
    async fn find_for_tenant(&self, id: &str, tenant_id: &str) -> DomainResult<Option<Document>>;
    async fn save(&self, document: Document) -> DomainResult<Document>;
}
