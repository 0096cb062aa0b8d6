//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{DateRange, UserFilters, UserItem, UserQuery, UserRole, UserStatus};
use crate::interfaces::http::common::ApiError;

/// User API representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub company: Option<String>,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserItem> for UserDto {
    fn from(u: UserItem) -> Self {
        let status = u.effective_status();
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            status,
            company: u.company,
            department: u.department,
            created_at: u.created_at,
        }
    }
}

/// Directory query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersParams {
    /// Matches name or email
    pub search: Option<String>,
    /// CLIENT, TEAM_MEMBER, TEAM_LEAD, STAFF or ADMIN
    pub role: Option<String>,
    /// ACTIVE, INACTIVE or SUSPENDED
    pub status: Option<String>,
    pub department: Option<String>,
    /// all, today, week or month
    pub date_range: Option<DateRange>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl ListUsersParams {
    pub fn into_query(self) -> Result<UserQuery, ApiError> {
        let role = non_empty(self.role)
            .map(|r| r.parse::<UserRole>())
            .transpose()
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        let status = non_empty(self.status)
            .map(|s| s.parse::<UserStatus>())
            .transpose()
            .map_err(|e| ApiError::bad_request(e.to_string()))?;

        Ok(UserQuery {
            filters: UserFilters {
                search: self.search.unwrap_or_default(),
                role,
                status,
                department: non_empty(self.department),
                date_range: self.date_range.unwrap_or_default(),
            },
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, 100),
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangeRoleRequest {
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_build_typed_filters() {
        let params = ListUsersParams {
            search: Some("ann".into()),
            role: Some("team_lead".into()),
            status: Some(" ".into()),
            department: Some("Sales".into()),
            date_range: Some(DateRange::Week),
            page: 0,
            page_size: 500,
        };
        let query = params.into_query().unwrap();
        assert_eq!(query.filters.role, Some(UserRole::TeamLead));
        assert_eq!(query.filters.status, None);
        assert_eq!(query.filters.department.as_deref(), Some("Sales"));
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 100);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let params = ListUsersParams {
            role: Some("owner".into()),
            ..Default::default()
        };
        let err = params.into_query().unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }
}
