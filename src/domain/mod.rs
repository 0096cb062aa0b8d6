//! Domain layer: entities, value objects and repository / port traits.
//!
//! Each aggregate lives in its own module with a `model` and a
//! `repository` (or `port` for services owned by someone else).

pub mod audit;
pub mod document;
pub mod esign;
pub mod repositories;
pub mod user;

pub use audit::{AuditEntry, AuditRepository, NewAuditEntry};
pub use document::{Document, DocumentRepository};
pub use esign::{ESignError, ESignService, Signer, SignerStatus, SigningSession, SigningStatus};
pub use repositories::RepositoryProvider;
pub use user::{
    CreateUserDto, DateRange, FilterChange, UserAccount, UserFilters, UserItem, UserQuery,
    UserRepository, UserRole, UserStatus,
};

pub use crate::shared::errors::{DomainError, DomainResult};
