//! Audit trail

pub mod model;
pub mod repository;

pub use model::{
    AuditEntry, NewAuditEntry, ACTION_CANCEL_SIGNING, ACTION_DOWNLOAD_SIGNED, ACTION_ROLE_CHANGED,
};
pub use repository::{record_best_effort, AuditRepository};
