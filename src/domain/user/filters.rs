//! Directory filter record
//!
//! Every field is explicit. Wholesale replacement (saved views, reset) and
//! single-field edits (`FilterChange`) are the only ways to mutate it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::model::{UserItem, UserRole, UserStatus};

/// Creation date window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl DateRange {
    /// Lower bound on `created_at`, `None` for `All`
    pub fn since(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::All => None,
            Self::Today => now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .map(|midnight| midnight.and_utc()),
            Self::Week => Some(now - Duration::days(7)),
            Self::Month => Some(now - Duration::days(30)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UserFilters {
    /// Matches name or email, case-insensitive
    pub search: String,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub department: Option<String>,
    pub date_range: DateRange,
}

/// A single-field edit of [`UserFilters`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FilterChange {
    Search(String),
    Role(Option<UserRole>),
    Status(Option<UserStatus>),
    Department(Option<String>),
    DateRange(DateRange),
}

impl UserFilters {
    /// Defaults with only the role set
    pub fn with_role(role: Option<UserRole>) -> Self {
        Self {
            role,
            ..Self::default()
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn apply(&mut self, change: FilterChange) {
        match change {
            FilterChange::Search(search) => self.search = search,
            FilterChange::Role(role) => self.role = role,
            FilterChange::Status(status) => self.status = status,
            FilterChange::Department(department) => {
                self.department = department.filter(|d| !d.trim().is_empty())
            }
            FilterChange::DateRange(range) => self.date_range = range,
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub fn search_term(&self) -> Option<&str> {
        let term = self.search.trim();
        (!term.is_empty()).then_some(term)
    }

    /// In-process evaluation, mirrors what the SQL repository does
    pub fn matches(&self, user: &UserItem, now: DateTime<Utc>) -> bool {
        if let Some(term) = self.search_term() {
            let term = term.to_lowercase();
            let in_name = user
                .name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&term));
            if !in_name && !user.email.to_lowercase().contains(&term) {
                return false;
            }
        }
        if self.role.is_some_and(|role| role != user.role) {
            return false;
        }
        if self
            .status
            .is_some_and(|status| status != user.effective_status())
        {
            return false;
        }
        if let Some(department) = &self.department {
            let same = user
                .department
                .as_deref()
                .is_some_and(|d| d.eq_ignore_ascii_case(department));
            if !same {
                return false;
            }
        }
        match self.date_range.since(now) {
            Some(since) => user.created_at >= since,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, email: &str, role: UserRole, days_old: i64) -> UserItem {
        UserItem {
            id: email.into(),
            tenant_id: "acme".into(),
            name: Some(name.into()),
            email: email.into(),
            role,
            status: None,
            company: None,
            department: Some("Sales".into()),
            created_at: Utc::now() - Duration::days(days_old),
        }
    }

    #[test]
    fn default_filters_match_everything() {
        let filters = UserFilters::default();
        assert!(filters.matches(&user("Ada", "ada@x.io", UserRole::Admin, 400), Utc::now()));
    }

    #[test]
    fn search_matches_name_or_email() {
        let filters = UserFilters {
            search: " LOVE ".into(),
            ..Default::default()
        };
        let now = Utc::now();
        assert!(filters.matches(&user("Ada Lovelace", "ada@x.io", UserRole::Client, 1), now));
        assert!(filters.matches(&user("Ada", "lovelace@x.io", UserRole::Client, 1), now));
        assert!(!filters.matches(&user("Grace", "grace@x.io", UserRole::Client, 1), now));
    }

    #[test]
    fn role_status_department_and_range_narrow() {
        let now = Utc::now();
        let old_admin = user("Ada", "ada@x.io", UserRole::Admin, 40);

        assert!(!UserFilters::with_role(Some(UserRole::Client)).matches(&old_admin, now));

        let mut filters = UserFilters::default();
        filters.apply(FilterChange::Status(Some(UserStatus::Inactive)));
        assert!(!filters.matches(&old_admin, now));

        let mut filters = UserFilters::default();
        filters.apply(FilterChange::Department(Some("sales".into())));
        assert!(filters.matches(&old_admin, now));

        filters.apply(FilterChange::DateRange(DateRange::Month));
        assert!(!filters.matches(&old_admin, now));
    }

    #[test]
    fn apply_keeps_other_fields() {
        let mut filters = UserFilters::with_role(Some(UserRole::Staff));
        filters.apply(FilterChange::Search("bob".into()));
        assert_eq!(filters.role, Some(UserRole::Staff));
        assert_eq!(filters.search, "bob");
    }

    #[test]
    fn reset_restores_defaults() {
        let mut filters = UserFilters::with_role(Some(UserRole::Admin));
        filters.apply(FilterChange::DateRange(DateRange::Week));
        filters.reset();
        assert!(filters.is_default());
    }

    #[test]
    fn filter_change_wire_format() {
        let change: FilterChange =
            serde_json::from_str(r#"{"field":"role","value":"TEAM_LEAD"}"#).unwrap();
        assert_eq!(change, FilterChange::Role(Some(UserRole::TeamLead)));

        let filters: UserFilters = serde_json::from_str(r#"{"dateRange":"week"}"#).unwrap();
        assert_eq!(filters.date_range, DateRange::Week);
        assert!(filters.search.is_empty());
    }
}
