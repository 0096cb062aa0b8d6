use async_trait::async_trait;
use thiserror::Error;

use super::model::SigningSession;

#[derive(Debug, Error)]
pub enum ESignError {
    #[error("Signing session {0} not found")]
    SessionNotFound(String),

    #[error("Signing service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Signing service unavailable: {0}")]
    Unavailable(String),

    #[error("Unexpected response from signing service: {0}")]
    InvalidResponse(String),
}

/// Outbound port to the external e-signature backend.
///
/// State transitions are owned by the service; cancellation is requested
/// unconditionally and invalid transitions are rejected on its side.
#[async_trait]
pub trait ESignService: Send + Sync {
    async fn get_signing_status(&self, session_id: &str) -> Result<SigningSession, ESignError>;
    async fn download_signed_document(&self, session_id: &str) -> Result<Vec<u8>, ESignError>;
    async fn cancel_signing_flow(&self, session_id: &str) -> Result<(), ESignError>;
}
