//! Workbench use-cases
//!
//! Every command returns a fresh snapshot so the client never has to merge
//! state itself.

use std::sync::Arc;

use serde_json::json;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{error, info};
use uuid::Uuid;

use super::layout::{ActionOutcome, QuickAction, SelectionCommand, Workbench, WorkbenchSnapshot};
use super::registry::{AccessError, SharedWorkbenchRegistry, Viewer};
use super::role_change::RoleChangeError;
use super::viewport::Viewport;
use super::views::SavedView;
use crate::domain::audit::{record_best_effort, ACTION_ROLE_CHANGED};
use crate::domain::{
    DomainError, NewAuditEntry, RepositoryProvider, UserFilters, UserItem, UserRole,
};

#[derive(Debug, Error)]
pub enum WorkbenchError {
    #[error("Workbench {0} not found")]
    NotFound(Uuid),
    #[error("Workbench {0} belongs to another user")]
    Forbidden(Uuid),
    #[error("Only admins can change user roles")]
    NotPermitted,
    #[error("User {0} is not in the current view")]
    UserNotFound(String),
    #[error("A role change for user {0} is already in progress")]
    RoleChangePending(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<AccessError> for WorkbenchError {
    fn from(e: AccessError) -> Self {
        match e {
            AccessError::NotFound(id) => Self::NotFound(id),
            AccessError::Forbidden(id) => Self::Forbidden(id),
        }
    }
}

impl From<RoleChangeError> for WorkbenchError {
    fn from(e: RoleChangeError) -> Self {
        match e {
            RoleChangeError::AlreadyPending(id) => Self::RoleChangePending(id),
        }
    }
}

pub type WorkbenchResult<T> = Result<T, WorkbenchError>;

pub struct WorkbenchService {
    repos: Arc<dyn RepositoryProvider>,
    registry: SharedWorkbenchRegistry,
    cms: watch::Receiver<bool>,
}

impl WorkbenchService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        registry: SharedWorkbenchRegistry,
        cms: watch::Receiver<bool>,
    ) -> Self {
        Self {
            repos,
            registry,
            cms,
        }
    }

    pub fn registry(&self) -> &SharedWorkbenchRegistry {
        &self.registry
    }

    // ── Lifecycle ───────────────────────────────────────────────

    pub async fn mount(&self, viewer: &Viewer, viewer_role: UserRole) -> WorkbenchResult<WorkbenchSnapshot> {
        let mut workbench = Workbench::new(
            viewer.tenant_id.clone(),
            viewer.user_id.clone(),
            viewer_role,
            self.cms.clone(),
        );
        let version = workbench.begin_load();
        let id = self.registry.mount(workbench);

        if let Err(e) = self.load(id, version, &viewer.tenant_id, UserFilters::default()).await {
            self.registry.discard(id);
            return Err(e);
        }
        self.snapshot(viewer, id, Viewport::default())
    }

    pub fn unmount(&self, viewer: &Viewer, id: Uuid) -> WorkbenchResult<()> {
        Ok(self.registry.unmount(viewer, id)?)
    }

    pub fn snapshot(&self, viewer: &Viewer, id: Uuid, viewport: Viewport) -> WorkbenchResult<WorkbenchSnapshot> {
        Ok(self.registry.with(viewer, id, |wb| wb.snapshot(viewport))?)
    }

    // ── Selection & sidebar ─────────────────────────────────────

    pub fn apply_selection(
        &self,
        viewer: &Viewer,
        id: Uuid,
        command: SelectionCommand,
    ) -> WorkbenchResult<WorkbenchSnapshot> {
        Ok(self.registry.with_mut(viewer, id, |wb| {
            wb.apply_selection(command);
            wb.snapshot(Viewport::default())
        })?)
    }

    pub fn toggle_sidebar(&self, viewer: &Viewer, id: Uuid) -> WorkbenchResult<WorkbenchSnapshot> {
        Ok(self.registry.with_mut(viewer, id, |wb| {
            wb.toggle_sidebar();
            wb.snapshot(Viewport::default())
        })?)
    }

    pub fn close_sidebar(&self, viewer: &Viewer, id: Uuid) -> WorkbenchResult<WorkbenchSnapshot> {
        Ok(self.registry.with_mut(viewer, id, |wb| {
            wb.close_sidebar();
            wb.snapshot(Viewport::default())
        })?)
    }

    pub fn quick_action(&self, viewer: &Viewer, id: Uuid, action: QuickAction) -> WorkbenchResult<ActionOutcome> {
        Ok(self.registry.with(viewer, id, |wb| wb.quick_action(action))?)
    }

    pub fn view_profile(&self, viewer: &Viewer, id: Uuid, user_id: &str) -> WorkbenchResult<UserItem> {
        self.registry
            .with(viewer, id, |wb| wb.view_profile(user_id).cloned())?
            .ok_or_else(|| WorkbenchError::UserNotFound(user_id.to_string()))
    }

    // ── Filters ─────────────────────────────────────────────────

    pub async fn replace_filters(
        &self,
        viewer: &Viewer,
        id: Uuid,
        filters: UserFilters,
    ) -> WorkbenchResult<WorkbenchSnapshot> {
        let version = self
            .registry
            .with_mut(viewer, id, |wb| wb.replace_filters(filters.clone()))?;
        self.reload(viewer, id, version, filters).await
    }

    pub async fn reset_filters(&self, viewer: &Viewer, id: Uuid) -> WorkbenchResult<WorkbenchSnapshot> {
        let version = self.registry.with_mut(viewer, id, |wb| wb.reset_filters())?;
        self.reload(viewer, id, version, UserFilters::default()).await
    }

    pub async fn apply_view(
        &self,
        viewer: &Viewer,
        id: Uuid,
        view: SavedView,
    ) -> WorkbenchResult<WorkbenchSnapshot> {
        let version = self.registry.with_mut(viewer, id, |wb| wb.apply_view(view))?;
        self.reload(viewer, id, version, view.filters()).await
    }

    async fn reload(
        &self,
        viewer: &Viewer,
        id: Uuid,
        version: u64,
        filters: UserFilters,
    ) -> WorkbenchResult<WorkbenchSnapshot> {
        if let Err(e) = self.load(id, version, &viewer.tenant_id, filters).await {
            self.registry.settle(id, |wb| wb.abort_load(version));
            return Err(e);
        }
        self.snapshot(viewer, id, Viewport::default())
    }

    /// Fetch users for `filters` and store them unless a newer load started
    async fn load(&self, id: Uuid, version: u64, tenant_id: &str, filters: UserFilters) -> WorkbenchResult<()> {
        let users = self.repos.users().list_all(tenant_id, &filters).await?;
        let all = if filters.is_default() {
            users.clone()
        } else {
            self.repos
                .users()
                .list_all(tenant_id, &UserFilters::default())
                .await?
        };

        match self.registry.settle(id, |wb| wb.finish_load(version, users, &all)) {
            Some(true) => Ok(()),
            Some(false) => {
                info!(workbench = %id, version, "Dropping stale user load");
                Ok(())
            }
            None => Err(WorkbenchError::NotFound(id)),
        }
    }

    // ── Role change ─────────────────────────────────────────────

    /// Change a row's role. The row is `Pending` while the update runs;
    /// failures end up in the row state instead of the response status.
    pub async fn change_role(
        &self,
        viewer: &Viewer,
        id: Uuid,
        user_id: &str,
        role: UserRole,
    ) -> WorkbenchResult<WorkbenchSnapshot> {
        self.registry.with_mut(viewer, id, |wb| {
            if !wb.viewer_role().can_manage_users() {
                return Err(WorkbenchError::NotPermitted);
            }
            if wb.find_user(user_id).is_none() {
                return Err(WorkbenchError::UserNotFound(user_id.to_string()));
            }
            wb.begin_role_change(user_id, role)?;
            Ok(())
        })??;

        let result = self
            .repos
            .users()
            .update_role(&viewer.tenant_id, user_id, role)
            .await;

        let settled = match result {
            Ok(Some(updated)) => {
                let previous = self
                    .registry
                    .settle(id, |wb| {
                        let previous = wb.find_user(user_id).map(|u| u.role);
                        wb.role_change_succeeded(updated);
                        previous
                    });
                record_best_effort(
                    self.repos.audit(),
                    NewAuditEntry::new(
                        ACTION_ROLE_CHANGED,
                        json!({
                            "userId": user_id,
                            "role": role.as_str(),
                            "previousRole": previous.flatten().map(|r| r.as_str()),
                        }),
                    )
                    .tenant(&viewer.tenant_id)
                    .actor(&viewer.user_id),
                )
                .await;
                info!(workbench = %id, user_id, role = %role, "User role changed");
                previous.is_some()
            }
            Ok(None) => self
                .registry
                .settle(id, |wb| wb.role_change_failed(user_id, "User no longer exists"))
                .is_some(),
            Err(e) => {
                error!(workbench = %id, user_id, error = %e, "Failed to change user role");
                self.registry
                    .settle(id, |wb| wb.role_change_failed(user_id, "Failed to update role"))
                    .is_some()
            }
        };

        if !settled {
            info!(workbench = %id, user_id, "Workbench unmounted before role change settled");
            return Err(WorkbenchError::NotFound(id));
        }
        self.snapshot(viewer, id, Viewport::default())
    }
}
