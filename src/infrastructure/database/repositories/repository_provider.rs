//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::{AuditRepository, DocumentRepository, RepositoryProvider, UserRepository};

use super::audit_repository::SeaOrmAuditRepository;
use super::document_repository::SeaOrmDocumentRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by one SeaORM connection pool.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let doc = repos.documents().find_for_tenant("doc-1", "acme").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    documents: SeaOrmDocumentRepository,
    audit: SeaOrmAuditRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            documents: SeaOrmDocumentRepository::new(db.clone()),
            audit: SeaOrmAuditRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn documents(&self) -> &dyn DocumentRepository {
        &self.documents
    }

    fn audit(&self) -> &dyn AuditRepository {
        &self.audit
    }
}
