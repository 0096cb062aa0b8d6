//! Workbench composition root
//!
//! Owns the selection, filters and sidebar visibility of one mounted admin
//! users page. Nothing here is persisted; unmounting drops it all.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use super::metrics::{OverviewMetrics, QuickStats};
use super::role_change::{RoleChangeError, RoleChangeTracker};
use super::selection::{SelectAllState, SelectionSet};
use super::table::{UsersTable, UsersTableView};
use super::viewport::Viewport;
use super::views::{SavedView, ViewCounts};
use crate::domain::{DomainError, UserFilters, UserItem, UserRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    Header,
    Sidebar,
    Metrics,
    Footer,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Header,
        Section::Sidebar,
        Section::Metrics,
        Section::Footer,
    ];

    /// CMS model rendered in place of the default component
    pub fn cms_model(&self) -> &'static str {
        match self {
            Self::Header => "admin-header",
            Self::Sidebar => "admin-sidebar",
            Self::Metrics => "admin-metrics",
            Self::Footer => "admin-footer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum SectionSource {
    Default,
    Cms { model: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub section: Section,
    pub source: SectionSource,
}

/// Selection command sent by the table and the directory header
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SelectionCommand {
    #[serde(rename_all = "camelCase")]
    Select { user_id: String, selected: bool },
    SelectAll { selected: bool },
    /// Header checkbox click
    ToggleAll,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuickAction {
    AddUser,
    Import,
    Export,
    Refresh,
}

impl QuickAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddUser => "add",
            Self::Import => "import",
            Self::Export => "export",
            Self::Refresh => "refresh",
        }
    }
}

impl fmt::Display for QuickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuickAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "add" | "add_user" | "add-user" => Ok(Self::AddUser),
            "import" => Ok(Self::Import),
            "export" => Ok(Self::Export),
            "refresh" => Ok(Self::Refresh),
            other => Err(DomainError::Validation(format!("Unknown action: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum ActionOutcome {
    Acknowledged { action: QuickAction },
    /// Client must reload the whole page
    ReloadPage,
}

/// Bulk actions footer, alive while the selection is non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    pub instance: u64,
    pub mounted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FooterView {
    pub instance: u64,
    pub mounted_at: DateTime<Utc>,
    pub selected_count: usize,
    pub selected_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryHeaderView {
    pub selected_count: usize,
    pub can_clear: bool,
    pub sidebar_open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SidebarView {
    pub open: bool,
    pub active_view: Option<SavedView>,
    pub view_counts: ViewCounts,
    pub quick_stats: QuickStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkbenchSnapshot {
    pub id: Uuid,
    pub cms_enabled: bool,
    pub sections: Vec<SectionView>,
    pub header: DirectoryHeaderView,
    pub sidebar: SidebarView,
    pub metrics: OverviewMetrics,
    pub filters: UserFilters,
    pub selection: Vec<String>,
    pub table: UsersTableView,
    pub footer: Option<FooterView>,
}

#[derive(Debug)]
pub struct Workbench {
    id: Uuid,
    tenant_id: String,
    owner_id: String,
    viewer_role: UserRole,
    selection: SelectionSet,
    filters: UserFilters,
    filters_version: u64,
    active_view: Option<SavedView>,
    sidebar_open: bool,
    users: Vec<UserItem>,
    loading: bool,
    stats: QuickStats,
    overview: OverviewMetrics,
    role_changes: RoleChangeTracker,
    cms: watch::Receiver<bool>,
    footer: Option<Footer>,
    footer_mounts: u64,
    mounted_at: DateTime<Utc>,
}

impl Workbench {
    pub fn new(
        tenant_id: impl Into<String>,
        owner_id: impl Into<String>,
        viewer_role: UserRole,
        cms: watch::Receiver<bool>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id: tenant_id.into(),
            owner_id: owner_id.into(),
            viewer_role,
            selection: SelectionSet::new(),
            filters: UserFilters::default(),
            filters_version: 0,
            active_view: Some(SavedView::All),
            sidebar_open: true,
            users: Vec::new(),
            loading: true,
            stats: QuickStats::default(),
            overview: OverviewMetrics::default(),
            role_changes: RoleChangeTracker::new(),
            cms,
            footer: None,
            footer_mounts: 0,
            mounted_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn viewer_role(&self) -> UserRole {
        self.viewer_role
    }

    pub fn mounted_at(&self) -> DateTime<Utc> {
        self.mounted_at
    }

    pub fn filters(&self) -> &UserFilters {
        &self.filters
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn users(&self) -> &[UserItem] {
        &self.users
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn footer(&self) -> Option<&Footer> {
        self.footer.as_ref()
    }

    pub fn role_changes(&self) -> &RoleChangeTracker {
        &self.role_changes
    }

    /// Current value of the CMS signal
    pub fn cms_enabled(&self) -> bool {
        *self.cms.borrow()
    }

    // Selection

    pub fn select_all_state(&self) -> SelectAllState {
        SelectAllState::of(&self.users, &self.selection)
    }

    pub fn apply_selection(&mut self, command: SelectionCommand) {
        match command {
            SelectionCommand::Select { user_id, selected } => {
                self.selection.select(user_id, selected)
            }
            SelectionCommand::SelectAll { selected } => self.select_all(selected),
            SelectionCommand::ToggleAll => {
                let target = self.select_all_state().toggle_target();
                self.select_all(target);
            }
            SelectionCommand::Clear => self.selection.clear(),
        }
        self.sync_footer();
    }

    fn select_all(&mut self, selected: bool) {
        self.selection
            .select_all(self.users.iter().map(|u| u.id.as_str()), selected);
    }

    fn sync_footer(&mut self) {
        match (self.selection.is_empty(), self.footer.is_some()) {
            (false, false) => {
                self.footer_mounts += 1;
                self.footer = Some(Footer {
                    instance: self.footer_mounts,
                    mounted_at: Utc::now(),
                });
            }
            (true, true) => self.footer = None,
            _ => {}
        }
    }

    // Filters

    /// Replace the filters and mark the table loading.
    /// Returns the version the next load must carry.
    pub fn replace_filters(&mut self, filters: UserFilters) -> u64 {
        self.filters = filters;
        self.active_view = None;
        self.begin_load()
    }

    pub fn reset_filters(&mut self) -> u64 {
        self.active_view = Some(SavedView::All);
        self.filters = UserFilters::default();
        self.begin_load()
    }

    pub fn apply_view(&mut self, view: SavedView) -> u64 {
        self.filters = view.filters();
        self.active_view = Some(view);
        self.begin_load()
    }

    pub fn begin_load(&mut self) -> u64 {
        self.filters_version += 1;
        self.loading = true;
        self.filters_version
    }

    pub fn filters_version(&self) -> u64 {
        self.filters_version
    }

    /// Store loaded users. Loads started for older filters are dropped.
    pub fn finish_load(&mut self, version: u64, users: Vec<UserItem>, all: &[UserItem]) -> bool {
        if version != self.filters_version {
            return false;
        }
        self.users = users;
        self.stats = QuickStats::from_users(all);
        self.overview = OverviewMetrics::from_users(all);
        self.loading = false;
        true
    }

    /// Leave loading state without replacing the rows
    pub fn abort_load(&mut self, version: u64) {
        if version == self.filters_version {
            self.loading = false;
        }
    }

    // Sidebar

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_open = !self.sidebar_open;
        self.sidebar_open
    }

    pub fn close_sidebar(&mut self) {
        self.sidebar_open = false;
    }

    // Rows

    pub fn find_user(&self, user_id: &str) -> Option<&UserItem> {
        self.users.iter().find(|u| u.id == user_id)
    }

    /// Profile lookup for a name click
    pub fn view_profile(&self, user_id: &str) -> Option<&UserItem> {
        self.find_user(user_id)
    }

    pub fn begin_role_change(&mut self, user_id: &str, role: UserRole) -> Result<(), RoleChangeError> {
        self.role_changes.begin(user_id, role)
    }

    pub fn role_change_succeeded(&mut self, updated: UserItem) {
        self.role_changes.succeed(&updated.id);
        if let Some(row) = self.users.iter_mut().find(|u| u.id == updated.id) {
            *row = updated;
        }
    }

    pub fn role_change_failed(&mut self, user_id: &str, message: impl Into<String>) {
        self.role_changes.fail(user_id, message);
    }

    pub fn quick_action(&self, action: QuickAction) -> ActionOutcome {
        match action {
            QuickAction::Refresh => {
                info!(workbench = %self.id, "Refresh requested, reloading page");
                ActionOutcome::ReloadPage
            }
            other => {
                info!(workbench = %self.id, action = %other, "Quick action not implemented");
                ActionOutcome::Acknowledged { action: other }
            }
        }
    }

    // Composition

    pub fn sections(&self) -> Vec<SectionView> {
        let cms = self.cms_enabled();
        Section::ALL
            .into_iter()
            .filter(|section| *section != Section::Footer || self.footer.is_some())
            .map(|section| SectionView {
                section,
                source: if cms {
                    SectionSource::Cms {
                        model: section.cms_model().to_string(),
                    }
                } else {
                    SectionSource::Default
                },
            })
            .collect()
    }

    pub fn table(&self) -> UsersTable<'_> {
        UsersTable {
            users: &self.users,
            selection: &self.selection,
            role_changes: &self.role_changes,
            loading: self.loading,
            can_manage_users: self.viewer_role.can_manage_users(),
        }
    }

    pub fn snapshot(&self, viewport: Viewport) -> WorkbenchSnapshot {
        WorkbenchSnapshot {
            id: self.id,
            cms_enabled: self.cms_enabled(),
            sections: self.sections(),
            header: DirectoryHeaderView {
                selected_count: self.selection.len(),
                can_clear: !self.selection.is_empty(),
                sidebar_open: self.sidebar_open,
            },
            sidebar: SidebarView {
                open: self.sidebar_open,
                active_view: self.active_view,
                view_counts: ViewCounts::from(&self.stats),
                quick_stats: self.stats,
            },
            metrics: self.overview,
            filters: self.filters.clone(),
            selection: self.selection.to_vec(),
            table: self.table().render(viewport),
            footer: self.footer.as_ref().map(|footer| FooterView {
                instance: footer.instance,
                mounted_at: footer.mounted_at,
                selected_count: self.selection.len(),
                selected_ids: self.selection.to_vec(),
            }),
        }
    }
}
