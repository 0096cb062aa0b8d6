use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::infrastructure::cms::{CmsClient, SLOT_MODELS};
use crate::interfaces::http::common::{ApiError, ApiResult};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct CmsHandlerState {
    pub cms: Arc<CmsClient>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CmsContentResponse {
    pub model: String,
    pub enabled: bool,
    /// Raw CMS payload, `null` while the CMS is disabled
    #[schema(value_type = Option<Object>)]
    pub content: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CmsToggle {
    pub enabled: bool,
}

#[utoipa::path(
    get,
    path = "/api/v1/cms/{model}",
    tag = "CMS",
    security(("bearer_auth" = [])),
    params(("model" = String, Path, description = "admin-header, admin-sidebar, admin-metrics or admin-footer")),
    responses(
        (status = 200, description = "Slot content", body = CmsContentResponse),
        (status = 404, description = "Unknown slot model"),
        (status = 502, description = "CMS unreachable")
    )
)]
pub async fn get_content(
    State(state): State<CmsHandlerState>,
    _user: AuthenticatedUser,
    Path(model): Path<String>,
) -> ApiResult<Json<CmsContentResponse>> {
    if !SLOT_MODELS.contains(&model.as_str()) {
        return Err(ApiError::not_found(format!("Unknown CMS model '{}'", model)));
    }

    let content = state
        .cms
        .content(&model)
        .await
        .map_err(|_| ApiError::new(StatusCode::BAD_GATEWAY, "CMS content unavailable"))?;

    Ok(Json(CmsContentResponse {
        enabled: state.cms.is_enabled(),
        model,
        content,
    }))
}

#[utoipa::path(
    put,
    path = "/api/v1/cms/enabled",
    tag = "CMS",
    security(("bearer_auth" = [])),
    request_body = CmsToggle,
    responses(
        (status = 200, description = "New CMS state", body = CmsToggle),
        (status = 400, description = "CMS has no credentials configured"),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn set_enabled(
    State(state): State<CmsHandlerState>,
    user: AuthenticatedUser,
    Json(toggle): Json<CmsToggle>,
) -> ApiResult<Json<CmsToggle>> {
    if !user.is_admin() {
        return Err(ApiError::forbidden("Only admins can toggle the CMS"));
    }
    if toggle.enabled && !state.cms.is_configured() {
        return Err(ApiError::bad_request("CMS is not configured"));
    }
    state.cms.set_enabled(toggle.enabled);
    Ok(Json(CmsToggle {
        enabled: state.cms.is_enabled(),
    }))
}
