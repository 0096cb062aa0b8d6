//! Registry of mounted workbenches

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::layout::Workbench;
use crate::shared::shutdown::ShutdownSignal;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("Workbench {0} not found")]
    NotFound(Uuid),
    #[error("Workbench {0} belongs to another user")]
    Forbidden(Uuid),
}

/// Who is asking for a workbench
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub tenant_id: String,
    pub user_id: String,
}

impl Viewer {
    pub fn new(tenant_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            user_id: user_id.into(),
        }
    }

    fn owns(&self, workbench: &Workbench) -> bool {
        workbench.tenant_id() == self.tenant_id && workbench.owner_id() == self.user_id
    }
}

/// Workbenches one user may keep mounted at once
pub const DEFAULT_MAX_PER_VIEWER: usize = 8;

struct Entry {
    workbench: Workbench,
    last_active: Instant,
}

impl Entry {
    fn touch(&mut self) {
        self.last_active = Instant::now();
    }
}

/// Thread-safe map of mounted workbenches.
/// Each entry is mutated under its shard lock.
pub struct WorkbenchRegistry {
    workbenches: DashMap<Uuid, Entry>,
    max_per_viewer: usize,
}

pub type SharedWorkbenchRegistry = Arc<WorkbenchRegistry>;

impl WorkbenchRegistry {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_PER_VIEWER)
    }

    pub fn with_limit(max_per_viewer: usize) -> Self {
        Self {
            workbenches: DashMap::new(),
            max_per_viewer: max_per_viewer.max(1),
        }
    }

    pub fn shared() -> SharedWorkbenchRegistry {
        Arc::new(Self::new())
    }

    /// Insert a workbench. When its owner is at the limit, the owner's least
    /// recently used workbench is unmounted first.
    pub fn mount(&self, workbench: Workbench) -> Uuid {
        let id = workbench.id();
        info!(
            workbench = %id,
            tenant_id = workbench.tenant_id(),
            owner_id = workbench.owner_id(),
            "Mounting workbench"
        );

        let viewer = Viewer::new(workbench.tenant_id(), workbench.owner_id());
        let mut owned: Vec<(Uuid, Instant)> = self
            .workbenches
            .iter()
            .filter(|e| viewer.owns(&e.workbench))
            .map(|e| (*e.key(), e.last_active))
            .collect();
        if owned.len() >= self.max_per_viewer {
            owned.sort_by_key(|(_, last_active)| *last_active);
            let excess = owned.len() + 1 - self.max_per_viewer;
            for (evicted, _) in owned.into_iter().take(excess) {
                self.workbenches.remove(&evicted);
                info!(workbench = %evicted, owner_id = viewer.user_id.as_str(), "Evicted least recently used workbench");
            }
        }

        self.workbenches.insert(
            id,
            Entry {
                workbench,
                last_active: Instant::now(),
            },
        );
        id
    }

    /// Drop an entry without an ownership check
    pub fn discard(&self, id: Uuid) -> bool {
        self.workbenches.remove(&id).is_some()
    }

    /// Unmount workbenches untouched for longer than `max_idle`
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        let before = self.workbenches.len();
        self.workbenches
            .retain(|_, entry| entry.last_active.elapsed() <= max_idle);
        let swept = before.saturating_sub(self.workbenches.len());
        if swept > 0 {
            info!(count = swept, "Unmounted idle workbenches");
        }
        swept
    }

    pub fn unmount(&self, viewer: &Viewer, id: Uuid) -> Result<(), AccessError> {
        self.with(viewer, id, |_| ())?;
        self.workbenches.remove(&id);
        info!(workbench = %id, "Unmounted workbench");
        Ok(())
    }

    /// Read access for the owner
    pub fn with<R>(
        &self,
        viewer: &Viewer,
        id: Uuid,
        f: impl FnOnce(&Workbench) -> R,
    ) -> Result<R, AccessError> {
        let mut entry = self
            .workbenches
            .get_mut(&id)
            .ok_or(AccessError::NotFound(id))?;
        if !viewer.owns(&entry.workbench) {
            warn!(workbench = %id, user_id = viewer.user_id.as_str(), "Workbench access denied");
            return Err(AccessError::Forbidden(id));
        }
        entry.touch();
        Ok(f(&entry.workbench))
    }

    /// Write access for the owner
    pub fn with_mut<R>(
        &self,
        viewer: &Viewer,
        id: Uuid,
        f: impl FnOnce(&mut Workbench) -> R,
    ) -> Result<R, AccessError> {
        let mut entry = self
            .workbenches
            .get_mut(&id)
            .ok_or(AccessError::NotFound(id))?;
        if !viewer.owns(&entry.workbench) {
            warn!(workbench = %id, user_id = viewer.user_id.as_str(), "Workbench access denied");
            return Err(AccessError::Forbidden(id));
        }
        entry.touch();
        Ok(f(&mut entry.workbench))
    }

    /// Mutate an entry if it is still mounted, without an ownership check.
    /// Used to settle work started by the owner.
    pub fn settle<R>(&self, id: Uuid, f: impl FnOnce(&mut Workbench) -> R) -> Option<R> {
        self.workbenches.get_mut(&id).map(|mut entry| f(&mut entry.workbench))
    }

    pub fn is_mounted(&self, id: Uuid) -> bool {
        self.workbenches.contains_key(&id)
    }

    pub fn count(&self) -> usize {
        self.workbenches.len()
    }
}

/// Periodically unmount workbenches whose page was abandoned
pub fn start_idle_sweeper(
    registry: SharedWorkbenchRegistry,
    shutdown: ShutdownSignal,
    interval: Duration,
    max_idle: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            interval_secs = interval.as_secs(),
            max_idle_secs = max_idle.as_secs(),
            "Workbench idle sweeper started"
        );
        let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(10)));
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    registry.sweep_idle(max_idle);
                }
                _ = shutdown.wait() => break,
            }
        }
        info!("Workbench idle sweeper stopped");
    })
}

impl Default for WorkbenchRegistry {
    fn default() -> Self {
        Self::new()
    }
}
