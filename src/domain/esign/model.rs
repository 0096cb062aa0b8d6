use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Overall status of a signing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SigningStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
    Declined,
    Expired,
}

impl SigningStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Declined => "DECLINED",
            Self::Expired => "EXPIRED",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for SigningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignerStatus {
    Pending,
    Viewed,
    Signed,
    Declined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Signer {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub status: SignerStatus,
    #[serde(default)]
    pub signed_at: Option<DateTime<Utc>>,
}

/// Snapshot of a signing session as reported by the signing service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningSession {
    pub session_id: String,
    pub overall_status: SigningStatus,
    #[serde(default)]
    pub signers: Vec<Signer>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub signed_document_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_parses_service_payload() {
        let raw = r#"{
            "sessionId": "s-1",
            "overallStatus": "IN_PROGRESS",
            "signers": [{"email": "a@x.io", "status": "SIGNED", "signedAt": "2024-05-01T10:00:00Z"}]
        }"#;
        let session: SigningSession = serde_json::from_str(raw).unwrap();
        assert_eq!(session.overall_status, SigningStatus::InProgress);
        assert_eq!(session.signers.len(), 1);
        assert!(session.completed_at.is_none());
        assert!(session.signed_document_url.is_none());
    }

    #[test]
    fn only_completed_is_completed() {
        assert!(SigningStatus::Completed.is_completed());
        assert!(!SigningStatus::Cancelled.is_completed());
        assert!(!SigningStatus::InProgress.is_completed());
    }
}
