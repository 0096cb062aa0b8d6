//! `GET`/`DELETE /api/documents/{id}/esign/{session_id}`
//!
//! Authentication, tenant and document ownership are checked in that
//! order before the signing service is contacted.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use super::dto::{CancelResponse, SigningQuery, SigningStatusResponse};
use crate::application::esign::{DocumentSigningService, SigningContext, SigningFlowError};
use crate::interfaces::http::common::{ApiError, ApiResult};
use crate::interfaces::http::middleware::TenantContext;

#[derive(Clone)]
pub struct DocumentHandlerState {
    pub signing: Arc<DocumentSigningService>,
}

impl From<SigningFlowError> for ApiError {
    fn from(e: SigningFlowError) -> Self {
        match e {
            SigningFlowError::DocumentNotFound => ApiError::not_found("Document not found"),
            SigningFlowError::NotYetSigned { status } => {
                ApiError::bad_request("Document not yet signed").with("status", status.as_str())
            }
            SigningFlowError::DownloadFailed(source) => {
                error!(error = %source, "Signed document download failed");
                ApiError::new(
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to download signed document",
                )
                .with("details", source.to_string())
            }
            other => ApiError::internal(other),
        }
    }
}

fn signing_context(ctx: TenantContext) -> SigningContext {
    SigningContext {
        tenant_id: ctx.tenant_id,
        actor_id: ctx.user.user_id,
    }
}

/// `attachment; filename="..."` with quotes and control characters dropped.
/// `filename` carries an ASCII fallback; non-ASCII names add an RFC 5987
/// `filename*` parameter.
fn attachment_disposition(filename: &str) -> String {
    let clean: String = filename
        .chars()
        .filter(|c| *c != '"' && *c != '\\' && !c.is_control())
        .collect();
    if clean.is_ascii() {
        return format!("attachment; filename=\"{}\"", clean);
    }
    let fallback: String = clean
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(&clean)
    )
}

#[utoipa::path(
    get,
    path = "/api/documents/{id}/esign/{session_id}",
    tag = "Documents",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Document ID"),
        ("session_id" = String, Path, description = "Signing session ID"),
        SigningQuery
    ),
    responses(
        (status = 200, description = "Session status, or the signed PDF with action=download", body = SigningStatusResponse),
        (status = 400, description = "Missing tenant or document not yet signed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Document not found"),
        (status = 500, description = "Signing service failure")
    )
)]
pub async fn get_signing(
    State(state): State<DocumentHandlerState>,
    ctx: TenantContext,
    Path((document_id, session_id)): Path<(String, String)>,
    Query(query): Query<SigningQuery>,
) -> ApiResult<Response> {
    let ctx = signing_context(ctx);

    if query.is_download() {
        let download = state
            .signing
            .download(&ctx, &document_id, &session_id)
            .await?;
        let headers = [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, attachment_disposition(&download.filename)),
        ];
        return Ok((headers, download.bytes).into_response());
    }

    let session = state
        .signing
        .status(&ctx, &document_id, &session_id)
        .await?;
    Ok(Json(SigningStatusResponse::new(document_id, session)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/documents/{id}/esign/{session_id}",
    tag = "Documents",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Document ID"),
        ("session_id" = String, Path, description = "Signing session ID")
    ),
    responses(
        (status = 200, description = "Signing flow cancelled", body = CancelResponse),
        (status = 400, description = "Missing tenant"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Document not found"),
        (status = 500, description = "Signing service failure")
    )
)]
pub async fn cancel_signing(
    State(state): State<DocumentHandlerState>,
    ctx: TenantContext,
    Path((document_id, session_id)): Path<(String, String)>,
) -> ApiResult<Json<CancelResponse>> {
    let ctx = signing_context(ctx);
    state
        .signing
        .cancel(&ctx, &document_id, &session_id)
        .await?;
    Ok(Json(CancelResponse {
        success: true,
        message: "Signing flow cancelled".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_quotes_filename() {
        assert_eq!(
            attachment_disposition("lease.pdf"),
            "attachment; filename=\"lease.pdf\""
        );
        assert_eq!(
            attachment_disposition("a\"b.pdf"),
            "attachment; filename=\"ab.pdf\""
        );
    }

    #[test]
    fn non_ascii_name_gets_encoded_parameter() {
        let value = attachment_disposition("Vertrag ü.pdf");
        assert_eq!(
            value,
            "attachment; filename=\"Vertrag _.pdf\"; filename*=UTF-8''Vertrag%20%C3%BC.pdf"
        );
        assert!(axum::http::HeaderValue::from_str(&value).is_ok());
    }

    #[test]
    fn only_download_action_downloads() {
        let download = SigningQuery { action: Some("download".into()) };
        let other = SigningQuery { action: Some("preview".into()) };
        assert!(download.is_download());
        assert!(!other.is_download());
        assert!(!SigningQuery::default().is_download());
    }
}
