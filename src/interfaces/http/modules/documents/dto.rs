use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Signer, SigningSession, SigningStatus};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SigningQuery {
    /// `download` streams the signed PDF, anything else returns the status
    pub action: Option<String>,
}

impl SigningQuery {
    pub fn is_download(&self) -> bool {
        self.action.as_deref() == Some("download")
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SigningStatusResponse {
    pub document_id: String,
    pub session_id: String,
    pub status: SigningStatus,
    pub signers: Vec<Signer>,
    pub completed_at: Option<DateTime<Utc>>,
    pub signed_document_url: Option<String>,
}

impl SigningStatusResponse {
    pub fn new(document_id: String, session: SigningSession) -> Self {
        Self {
            document_id,
            session_id: session.session_id,
            status: session.overall_status,
            signers: session.signers,
            completed_at: session.completed_at,
            signed_document_url: session.signed_document_url,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CancelResponse {
    pub success: bool,
    pub message: String,
}
