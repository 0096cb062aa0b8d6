//! Saved views shown in the sidebar

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::metrics::QuickStats;
use crate::domain::{DomainError, UserFilters, UserRole};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SavedView {
    #[default]
    All,
    Clients,
    Team,
    Admins,
}

impl SavedView {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Clients => "clients",
            Self::Team => "team",
            Self::Admins => "admins",
        }
    }

    /// Role filter the view applies. `Team` has none.
    pub fn role(&self) -> Option<UserRole> {
        match self {
            Self::Clients => Some(UserRole::Client),
            Self::Admins => Some(UserRole::Admin),
            Self::All | Self::Team => None,
        }
    }

    /// Filters that replace the current ones when the view is applied
    pub fn filters(&self) -> UserFilters {
        UserFilters::with_role(self.role())
    }
}

impl fmt::Display for SavedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SavedView {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "clients" => Ok(Self::Clients),
            "team" => Ok(Self::Team),
            "admins" => Ok(Self::Admins),
            other => Err(DomainError::Validation(format!("Unknown view: {other}"))),
        }
    }
}

/// Badge counts next to each saved view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewCounts {
    pub all: u64,
    pub clients: u64,
    pub team: u64,
    pub admins: u64,
}

impl From<&QuickStats> for ViewCounts {
    fn from(stats: &QuickStats) -> Self {
        Self {
            all: stats.total,
            clients: stats.clients,
            team: stats.staff + stats.admins,
            admins: stats.admins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_replace_filters_with_role_only() {
        assert_eq!(SavedView::Clients.filters().role, Some(UserRole::Client));
        assert_eq!(SavedView::Admins.filters().role, Some(UserRole::Admin));
        assert!(SavedView::Team.filters().is_default());
        assert!(SavedView::All.filters().is_default());
    }

    #[test]
    fn parse_view() {
        assert_eq!("Clients".parse::<SavedView>().unwrap(), SavedView::Clients);
        assert!("everyone".parse::<SavedView>().is_err());
    }

    #[test]
    fn counts_from_stats() {
        let stats = QuickStats {
            total: 10,
            clients: 6,
            staff: 3,
            admins: 1,
            active: 10,
        };
        let counts = ViewCounts::from(&stats);
        assert_eq!(counts.team, 4);
        assert_eq!(counts.all, 10);
    }
}
