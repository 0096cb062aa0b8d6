use chrono::{DateTime, Utc};
use serde_json::Value;

pub const ACTION_DOWNLOAD_SIGNED: &str = "documents:download_signed";
pub const ACTION_CANCEL_SIGNING: &str = "documents:cancel_signing";
pub const ACTION_ROLE_CHANGED: &str = "users:role_changed";

/// Audit entry to be written
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub tenant_id: Option<String>,
    pub actor_id: Option<String>,
    pub action: String,
    pub details: Value,
}

impl NewAuditEntry {
    pub fn new(action: impl Into<String>, details: Value) -> Self {
        Self {
            tenant_id: None,
            actor_id: None,
            action: action.into(),
            details,
        }
    }

    pub fn tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn actor(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }
}

/// Stored audit entry
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: String,
    pub tenant_id: Option<String>,
    pub actor_id: Option<String>,
    pub action: String,
    pub details: Value,
    pub created_at: DateTime<Utc>,
}
