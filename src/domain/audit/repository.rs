use async_trait::async_trait;
use tracing::warn;

use super::model::{AuditEntry, NewAuditEntry};
use crate::domain::DomainResult;

#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn record(&self, entry: NewAuditEntry) -> DomainResult<AuditEntry>;
    async fn list_for_tenant(&self, tenant_id: &str, limit: u64) -> DomainResult<Vec<AuditEntry>>;
}

/// Write an audit entry. Failures are logged and swallowed.
pub async fn record_best_effort(audit: &dyn AuditRepository, entry: NewAuditEntry) {
    let action = entry.action.clone();
    if let Err(e) = audit.record(entry).await {
        warn!(action = %action, error = %e, "Failed to write audit entry");
    }
}
