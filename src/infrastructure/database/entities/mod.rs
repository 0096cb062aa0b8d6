//! Database entities module

pub mod audit_log;
pub mod document;
pub mod user;

pub use audit_log::Entity as AuditLog;
pub use document::Entity as DocumentEntity;
pub use user::Entity as User;
