use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::DomainError;

/// Role of a user inside a tenant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Client,
    TeamMember,
    TeamLead,
    Staff,
    Admin,
}

impl UserRole {
    pub const ALL: [UserRole; 5] = [
        UserRole::Client,
        UserRole::TeamMember,
        UserRole::TeamLead,
        UserRole::Staff,
        UserRole::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "CLIENT",
            Self::TeamMember => "TEAM_MEMBER",
            Self::TeamLead => "TEAM_LEAD",
            Self::Staff => "STAFF",
            Self::Admin => "ADMIN",
        }
    }

    /// Human readable label used by the role picker
    pub fn label(&self) -> &'static str {
        match self {
            Self::Client => "Client",
            Self::TeamMember => "Team Member",
            Self::TeamLead => "Team Lead",
            Self::Staff => "Staff",
            Self::Admin => "Admin",
        }
    }

    /// Only admins may change other users' roles.
    pub fn can_manage_users(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::Validation(format!("Unknown role '{}'", s)))
    }
}

/// Account status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Suspended => "SUSPENDED",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            "SUSPENDED" => Ok(Self::Suspended),
            _ => Err(DomainError::Validation(format!("Unknown status '{}'", s))),
        }
    }
}

/// A user as shown in the admin directory
#[derive(Debug, Clone, PartialEq)]
pub struct UserItem {
    pub id: String,
    pub tenant_id: String,
    pub name: Option<String>,
    pub email: String,
    pub role: UserRole,
    pub status: Option<UserStatus>,
    pub company: Option<String>,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserItem {
    /// Name shown on the row, `Unnamed User` when none is stored
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("Unnamed User")
    }

    /// Name if present, otherwise the email
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.email)
    }

    /// Avatar initial
    pub fn initial(&self) -> char {
        self.label()
            .chars()
            .next()
            .map(|c| c.to_uppercase().next().unwrap_or(c))
            .unwrap_or('?')
    }

    /// A missing status is treated as active
    pub fn effective_status(&self) -> UserStatus {
        self.status.unwrap_or_default()
    }
}

/// User together with credentials, used only by login
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub user: UserItem,
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: Option<&str>, email: &str) -> UserItem {
        UserItem {
            id: "u1".into(),
            tenant_id: "acme".into(),
            name: name.map(String::from),
            email: email.into(),
            role: UserRole::Client,
            status: None,
            company: None,
            department: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn display_name_falls_back_to_unnamed() {
        assert_eq!(user(None, "a@x.io").display_name(), "Unnamed User");
        assert_eq!(user(Some(""), "a@x.io").display_name(), "Unnamed User");
        assert_eq!(user(Some("Ada"), "a@x.io").display_name(), "Ada");
    }

    #[test]
    fn initial_uses_name_then_email() {
        assert_eq!(user(Some("ada"), "z@x.io").initial(), 'A');
        assert_eq!(user(None, "zed@x.io").initial(), 'Z');
    }

    #[test]
    fn missing_status_is_active() {
        assert_eq!(user(None, "a@x.io").effective_status(), UserStatus::Active);
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("team_lead".parse::<UserRole>().unwrap(), UserRole::TeamLead);
        assert_eq!("ADMIN".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("owner".parse::<UserRole>().is_err());
    }

    #[test]
    fn role_serializes_screaming_snake() {
        let json = serde_json::to_string(&UserRole::TeamMember).unwrap();
        assert_eq!(json, "\"TEAM_MEMBER\"");
    }
}
