//! Tenant-scoped access to a document's signing session
//!
//! The document must exist in the caller's tenant before the signing
//! service is contacted at all.

use std::sync::Arc;

use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::audit::{record_best_effort, ACTION_CANCEL_SIGNING, ACTION_DOWNLOAD_SIGNED};
use crate::domain::{
    Document, DomainError, ESignError, ESignService, NewAuditEntry, RepositoryProvider,
    SigningSession, SigningStatus,
};

/// Caller identity and tenant resolved by the HTTP layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
    pub tenant_id: String,
    pub actor_id: String,
}

#[derive(Debug, Error)]
pub enum SigningFlowError {
    #[error("Document not found")]
    DocumentNotFound,

    #[error("Document not yet signed ({status})")]
    NotYetSigned { status: SigningStatus },

    #[error("Failed to download signed document: {0}")]
    DownloadFailed(#[source] ESignError),

    #[error("Signing service error: {0}")]
    Upstream(#[from] ESignError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Signed PDF ready to be streamed
#[derive(Debug, Clone)]
pub struct SignedDownload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct DocumentSigningService {
    repos: Arc<dyn RepositoryProvider>,
    esign: Arc<dyn ESignService>,
}

impl DocumentSigningService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, esign: Arc<dyn ESignService>) -> Self {
        Self { repos, esign }
    }

    async fn document(&self, ctx: &SigningContext, document_id: &str) -> Result<Document, SigningFlowError> {
        self.repos
            .documents()
            .find_for_tenant(document_id, &ctx.tenant_id)
            .await?
            .ok_or(SigningFlowError::DocumentNotFound)
    }

    /// Current state of the signing session
    pub async fn status(
        &self,
        ctx: &SigningContext,
        document_id: &str,
        session_id: &str,
    ) -> Result<SigningSession, SigningFlowError> {
        self.document(ctx, document_id).await?;
        Ok(self.esign.get_signing_status(session_id).await?)
    }

    /// Signed PDF, only once the session is completed
    pub async fn download(
        &self,
        ctx: &SigningContext,
        document_id: &str,
        session_id: &str,
    ) -> Result<SignedDownload, SigningFlowError> {
        let document = self.document(ctx, document_id).await?;

        let session = self.esign.get_signing_status(session_id).await?;
        if !session.overall_status.is_completed() {
            return Err(SigningFlowError::NotYetSigned {
                status: session.overall_status,
            });
        }

        let bytes = self
            .esign
            .download_signed_document(session_id)
            .await
            .map_err(|e| {
                warn!(document_id, session_id, error = %e, "Signed document download failed");
                SigningFlowError::DownloadFailed(e)
            })?;

        record_best_effort(
            self.repos.audit(),
            NewAuditEntry::new(
                ACTION_DOWNLOAD_SIGNED,
                json!({
                    "documentId": document_id,
                    "sessionId": session_id,
                    "size": bytes.len(),
                }),
            )
            .tenant(&ctx.tenant_id)
            .actor(&ctx.actor_id),
        )
        .await;
        metrics::counter!("esign_downloads_total").increment(1);
        info!(document_id, session_id, size = bytes.len(), "Signed document downloaded");

        Ok(SignedDownload {
            filename: document.signed_filename().to_string(),
            bytes,
        })
    }

    /// Cancel the flow whatever its current status
    pub async fn cancel(
        &self,
        ctx: &SigningContext,
        document_id: &str,
        session_id: &str,
    ) -> Result<(), SigningFlowError> {
        self.document(ctx, document_id).await?;
        self.esign.cancel_signing_flow(session_id).await?;

        record_best_effort(
            self.repos.audit(),
            NewAuditEntry::new(
                ACTION_CANCEL_SIGNING,
                json!({
                    "documentId": document_id,
                    "sessionId": session_id,
                    "cancelledBy": ctx.actor_id,
                }),
            )
            .tenant(&ctx.tenant_id)
            .actor(&ctx.actor_id),
        )
        .await;
        metrics::counter!("esign_cancellations_total").increment(1);
        info!(document_id, session_id, "Signing flow cancelled");
        Ok(())
    }
}
