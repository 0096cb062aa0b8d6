//! Unified access to the per-aggregate repositories

use super::audit::AuditRepository;
use super::document::DocumentRepository;
use super::user::UserRepository;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let doc = repos.documents().find_for_tenant("doc-1", "acme").await?;
///     let users = repos.users().list_all("acme", &UserFilters::default()).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn documents(&self) -> &dyn DocumentRepository;
    fn audit(&self) -> &dyn AuditRepository;
}
