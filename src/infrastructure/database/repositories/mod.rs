//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod audit_repository;
pub mod document_repository;
pub mod repository_provider;
pub mod user_repository;

pub use audit_repository::SeaOrmAuditRepository;
pub use document_repository::SeaOrmDocumentRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use user_repository::SeaOrmUserRepository;
