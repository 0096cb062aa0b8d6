//! Per-row role change state
//!
//! A row moves `Idle -> Pending -> Idle` on success or
//! `Idle -> Pending -> Failed` on error. A second request while `Pending`
//! is refused, so a double click cannot issue two concurrent updates.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::UserRole;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum RoleChangeState {
    #[default]
    Idle,
    Pending {
        role: UserRole,
    },
    Failed {
        role: UserRole,
        message: String,
    },
}

impl RoleChangeState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoleChangeError {
    #[error("A role change for user {0} is already in progress")]
    AlreadyPending(String),
}

/// Role change state of every row that is not idle
#[derive(Debug, Default)]
pub struct RoleChangeTracker {
    rows: HashMap<String, RoleChangeState>,
}

static IDLE: RoleChangeState = RoleChangeState::Idle;

impl RoleChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, user_id: &str) -> &RoleChangeState {
        self.rows.get(user_id).unwrap_or(&IDLE)
    }

    pub fn begin(&mut self, user_id: &str, role: UserRole) -> Result<(), RoleChangeError> {
        if self.state(user_id).is_pending() {
            return Err(RoleChangeError::AlreadyPending(user_id.to_string()));
        }
        self.rows
            .insert(user_id.to_string(), RoleChangeState::Pending { role });
        Ok(())
    }

    pub fn succeed(&mut self, user_id: &str) {
        self.rows.remove(user_id);
    }

    pub fn fail(&mut self, user_id: &str, message: impl Into<String>) {
        let role = match self.rows.get(user_id) {
            Some(RoleChangeState::Pending { role }) | Some(RoleChangeState::Failed { role, .. }) => {
                *role
            }
            _ => return,
        };
        self.rows.insert(
            user_id.to_string(),
            RoleChangeState::Failed {
                role,
                message: message.into(),
            },
        );
    }

    pub fn pending_count(&self) -> usize {
        self.rows.values().filter(|s| s.is_pending()).count()
    }
}
