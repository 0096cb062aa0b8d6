//! Users table view model

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::role_change::{RoleChangeState, RoleChangeTracker};
use super::selection::{SelectAllState, SelectionSet};
use super::viewport::{VirtualWindow, Viewport};
use crate::domain::{UserItem, UserRole, UserStatus};

/// Placeholder rows shown while the table is loading
pub const SKELETON_ROWS: usize = 8;
pub const EMPTY_MESSAGE: &str = "No users found matching your criteria.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleOption {
    pub value: UserRole,
    pub label: String,
}

/// Inline role picker, present only for viewers who can manage users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleControl {
    pub current: UserRole,
    pub options: Vec<RoleOption>,
    pub disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum RowAction {
    ViewProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRowView {
    pub id: String,
    pub display_name: String,
    /// Accessible label, name or email
    pub label: String,
    pub initial: String,
    pub email: String,
    pub company: Option<String>,
    pub joined_at: DateTime<Utc>,
    pub status: UserStatus,
    pub role: UserRole,
    pub selected: bool,
    pub role_control: Option<RoleControl>,
    pub role_change: RoleChangeState,
    pub actions: Vec<RowAction>,
}

/// Map one user plus its UI state to a row
pub fn render_user_row(
    user: &UserItem,
    selected: bool,
    role_change: &RoleChangeState,
    can_manage_users: bool,
) -> UserRowView {
    let role_control = can_manage_users.then(|| RoleControl {
        current: user.role,
        options: UserRole::ALL
            .into_iter()
            .map(|role| RoleOption {
                value: role,
                label: role.label().to_string(),
            })
            .collect(),
        disabled: role_change.is_pending(),
    });

    UserRowView {
        id: user.id.clone(),
        display_name: user.display_name().to_string(),
        label: user.label().to_string(),
        initial: user.initial().to_string(),
        email: user.email.clone(),
        company: user.company.clone(),
        joined_at: user.created_at,
        status: user.effective_status(),
        role: user.role,
        selected,
        role_control,
        role_change: role_change.clone(),
        actions: vec![RowAction::ViewProfile],
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableHeader {
    /// Select-all control is shown only for a non-empty list
    pub visible: bool,
    pub state: SelectAllState,
    pub checked: bool,
    pub label: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TableBody {
    Loading {
        skeleton_rows: usize,
    },
    Empty {
        message: String,
    },
    Rows {
        window: VirtualWindow,
        rows: Vec<UserRowView>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsersTableView {
    pub header: TableHeader,
    pub body: TableBody,
    pub row_count: usize,
}

/// Borrowed view over the data the table renders
pub struct UsersTable<'a> {
    pub users: &'a [UserItem],
    pub selection: &'a SelectionSet,
    pub role_changes: &'a RoleChangeTracker,
    pub loading: bool,
    pub can_manage_users: bool,
}

impl<'a> UsersTable<'a> {
    pub fn select_all_state(&self) -> SelectAllState {
        SelectAllState::of(self.users, self.selection)
    }

    pub fn header(&self) -> TableHeader {
        let state = self.select_all_state();
        let label = if self.selection.is_empty() {
            "Select all".to_string()
        } else {
            format!("{} selected", self.selection.len())
        };
        TableHeader {
            visible: !self.users.is_empty(),
            state,
            checked: state.all_selected() || state.some_selected(),
            label,
            title: if state.all_selected() {
                "Deselect all users".to_string()
            } else {
                "Select all users".to_string()
            },
        }
    }

    pub fn body(&self, viewport: Viewport) -> TableBody {
        if self.loading {
            return TableBody::Loading {
                skeleton_rows: SKELETON_ROWS,
            };
        }
        if self.users.is_empty() {
            return TableBody::Empty {
                message: EMPTY_MESSAGE.to_string(),
            };
        }

        let window = VirtualWindow::for_directory(self.users.len(), viewport);
        let rows = self.users[window.range()]
            .iter()
            .map(|user| {
                render_user_row(
                    user,
                    self.selection.contains(&user.id),
                    self.role_changes.state(&user.id),
                    self.can_manage_users,
                )
            })
            .collect();

        TableBody::Rows { window, rows }
    }

    pub fn render(&self, viewport: Viewport) -> UsersTableView {
        UsersTableView {
            header: self.header(),
            body: self.body(viewport),
            row_count: self.users.len(),
        }
    }
}
