//! Overview cards and sidebar quick stats

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{UserItem, UserRole, UserStatus};

/// Numbers shown on the overview cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverviewMetrics {
    pub total_users: u64,
    /// Users in `INACTIVE` status
    pub pending_approvals: u64,
    /// Users in `ACTIVE` status
    pub in_progress_workflows: u64,
    pub due_this_week: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuickStats {
    pub total: u64,
    pub clients: u64,
    /// Staff, team members and team leads
    pub staff: u64,
    pub admins: u64,
    pub active: u64,
}

impl OverviewMetrics {
    pub fn from_users(users: &[UserItem]) -> Self {
        let count = |status: UserStatus| {
            users
                .iter()
                .filter(|u| u.effective_status() == status)
                .count() as u64
        };
        Self {
            total_users: users.len() as u64,
            pending_approvals: count(UserStatus::Inactive),
            in_progress_workflows: count(UserStatus::Active),
            due_this_week: 0,
        }
    }
}

impl QuickStats {
    pub fn from_users(users: &[UserItem]) -> Self {
        let mut stats = Self {
            total: users.len() as u64,
            ..Self::default()
        };
        for user in users {
            match user.role {
                UserRole::Client => stats.clients += 1,
                UserRole::Admin => stats.admins += 1,
                UserRole::Staff | UserRole::TeamMember | UserRole::TeamLead => stats.staff += 1,
            }
        }
        stats.active = stats.clients + stats.staff + stats.admins;
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: UserRole, status: Option<UserStatus>) -> UserItem {
        UserItem {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: "acme".into(),
            name: None,
            email: "x@y.z".into(),
            role,
            status,
            company: None,
            department: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn overview_counts_statuses() {
        let users = vec![
            user(UserRole::Client, None),
            user(UserRole::Client, Some(UserStatus::Inactive)),
            user(UserRole::Admin, Some(UserStatus::Suspended)),
        ];
        let metrics = OverviewMetrics::from_users(&users);
        assert_eq!(metrics.total_users, 3);
        assert_eq!(metrics.pending_approvals, 1);
        assert_eq!(metrics.in_progress_workflows, 1);
        assert_eq!(metrics.due_this_week, 0);
    }

    #[test]
    fn quick_stats_group_roles() {
        let users = vec![
            user(UserRole::Client, None),
            user(UserRole::TeamLead, None),
            user(UserRole::TeamMember, None),
            user(UserRole::Staff, None),
            user(UserRole::Admin, None),
        ];
        let stats = QuickStats::from_users(&users);
        assert_eq!(stats.clients, 1);
        assert_eq!(stats.staff, 3);
        assert_eq!(stats.admins, 1);
        assert_eq!(stats.active, 5);
    }
}
