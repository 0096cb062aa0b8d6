use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::dto::ViewportParams;
use crate::application::workbench::{
    ActionOutcome, QuickAction, SavedView, SelectionCommand, Viewer, WorkbenchError,
    WorkbenchService, WorkbenchSnapshot,
};
use crate::domain::UserFilters;
use crate::interfaces::http::common::{ApiError, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::TenantContext;
use crate::interfaces::http::modules::users::{ChangeRoleRequest, UserDto};

#[derive(Clone)]
pub struct WorkbenchHandlerState {
    pub workbenches: Arc<WorkbenchService>,
}

impl From<WorkbenchError> for ApiError {
    fn from(e: WorkbenchError) -> Self {
        match e {
            WorkbenchError::NotFound(_) => ApiError::not_found("Workbench not found"),
            WorkbenchError::Forbidden(_) => ApiError::forbidden("Workbench belongs to another user"),
            WorkbenchError::NotPermitted => ApiError::forbidden(e.to_string()),
            WorkbenchError::UserNotFound(_) => ApiError::not_found("User not found"),
            WorkbenchError::RoleChangePending(_) => ApiError::conflict(e.to_string()),
            WorkbenchError::Domain(inner) => inner.into(),
        }
    }
}

fn viewer(ctx: &TenantContext) -> Viewer {
    Viewer::new(&ctx.tenant_id, &ctx.user.user_id)
}

#[utoipa::path(
    post,
    path = "/api/v1/workbench",
    tag = "Workbench",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Workbench mounted", body = WorkbenchSnapshot),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn mount_workbench(
    State(state): State<WorkbenchHandlerState>,
    ctx: TenantContext,
) -> ApiResult<(StatusCode, Json<WorkbenchSnapshot>)> {
    let snapshot = state.workbenches.mount(&viewer(&ctx), ctx.user.role).await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

#[utoipa::path(
    get,
    path = "/api/v1/workbench/{id}",
    tag = "Workbench",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Workbench ID"), ViewportParams),
    responses(
        (status = 200, description = "Composed workbench", body = WorkbenchSnapshot),
        (status = 404, description = "Not mounted")
    )
)]
pub async fn get_workbench(
    State(state): State<WorkbenchHandlerState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
    Query(params): Query<ViewportParams>,
) -> ApiResult<Json<WorkbenchSnapshot>> {
    let snapshot = state
        .workbenches
        .snapshot(&viewer(&ctx), id, params.viewport())?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    delete,
    path = "/api/v1/workbench/{id}",
    tag = "Workbench",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Workbench ID")),
    responses(
        (status = 204, description = "Workbench unmounted"),
        (status = 404, description = "Not mounted")
    )
)]
pub async fn unmount_workbench(
    State(state): State<WorkbenchHandlerState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.workbenches.unmount(&viewer(&ctx), id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/workbench/{id}/selection",
    tag = "Workbench",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Workbench ID")),
    request_body = SelectionCommand,
    responses((status = 200, description = "Selection applied", body = WorkbenchSnapshot))
)]
pub async fn apply_selection(
    State(state): State<WorkbenchHandlerState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
    Json(command): Json<SelectionCommand>,
) -> ApiResult<Json<WorkbenchSnapshot>> {
    let snapshot = state
        .workbenches
        .apply_selection(&viewer(&ctx), id, command)?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    put,
    path = "/api/v1/workbench/{id}/filters",
    tag = "Workbench",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Workbench ID")),
    request_body = UserFilters,
    responses((status = 200, description = "Filters replaced and users reloaded", body = WorkbenchSnapshot))
)]
pub async fn replace_filters(
    State(state): State<WorkbenchHandlerState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
    Json(filters): Json<UserFilters>,
) -> ApiResult<Json<WorkbenchSnapshot>> {
    let snapshot = state
        .workbenches
        .replace_filters(&viewer(&ctx), id, filters)
        .await?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    post,
    path = "/api/v1/workbench/{id}/filters/reset",
    tag = "Workbench",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Workbench ID")),
    responses((status = 200, description = "Filters reset and users reloaded", body = WorkbenchSnapshot))
)]
pub async fn reset_filters(
    State(state): State<WorkbenchHandlerState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<WorkbenchSnapshot>> {
    let snapshot = state.workbenches.reset_filters(&viewer(&ctx), id).await?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    post,
    path = "/api/v1/workbench/{id}/views/{view}",
    tag = "Workbench",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Workbench ID"),
        ("view" = SavedView, Path, description = "all, clients, team or admins")
    ),
    responses(
        (status = 200, description = "Saved view applied", body = WorkbenchSnapshot),
        (status = 400, description = "Unknown view")
    )
)]
pub async fn apply_view(
    State(state): State<WorkbenchHandlerState>,
    ctx: TenantContext,
    Path((id, view)): Path<(Uuid, String)>,
) -> ApiResult<Json<WorkbenchSnapshot>> {
    let view = view.parse::<SavedView>()?;
    let snapshot = state
        .workbenches
        .apply_view(&viewer(&ctx), id, view)
        .await?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    post,
    path = "/api/v1/workbench/{id}/users/{user_id}/role",
    tag = "Workbench",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Workbench ID"),
        ("user_id" = String, Path, description = "User ID")
    ),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Role change settled; failures are reported in the row", body = WorkbenchSnapshot),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User not in the current view"),
        (status = 409, description = "A role change for this user is already pending")
    )
)]
pub async fn change_role(
    State(state): State<WorkbenchHandlerState>,
    ctx: TenantContext,
    Path((id, user_id)): Path<(Uuid, String)>,
    ValidatedJson(request): ValidatedJson<ChangeRoleRequest>,
) -> ApiResult<Json<WorkbenchSnapshot>> {
    let snapshot = state
        .workbenches
        .change_role(&viewer(&ctx), id, &user_id, request.role)
        .await?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    get,
    path = "/api/v1/workbench/{id}/users/{user_id}",
    tag = "Workbench",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Workbench ID"),
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Loaded user profile", body = UserDto),
        (status = 404, description = "User not in the current view")
    )
)]
pub async fn view_profile(
    State(state): State<WorkbenchHandlerState>,
    ctx: TenantContext,
    Path((id, user_id)): Path<(Uuid, String)>,
) -> ApiResult<Json<UserDto>> {
    let user = state.workbenches.view_profile(&viewer(&ctx), id, &user_id)?;
    Ok(Json(UserDto::from(user)))
}

#[utoipa::path(
    post,
    path = "/api/v1/workbench/{id}/sidebar/toggle",
    tag = "Workbench",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Workbench ID")),
    responses((status = 200, description = "Sidebar toggled", body = WorkbenchSnapshot))
)]
pub async fn toggle_sidebar(
    State(state): State<WorkbenchHandlerState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<WorkbenchSnapshot>> {
    Ok(Json(state.workbenches.toggle_sidebar(&viewer(&ctx), id)?))
}

#[utoipa::path(
    post,
    path = "/api/v1/workbench/{id}/sidebar/close",
    tag = "Workbench",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Workbench ID")),
    responses((status = 200, description = "Sidebar hidden", body = WorkbenchSnapshot))
)]
pub async fn close_sidebar(
    State(state): State<WorkbenchHandlerState>,
    ctx: TenantContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<WorkbenchSnapshot>> {
    Ok(Json(state.workbenches.close_sidebar(&viewer(&ctx), id)?))
}

#[utoipa::path(
    post,
    path = "/api/v1/workbench/{id}/actions/{action}",
    tag = "Workbench",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Workbench ID"),
        ("action" = QuickAction, Path, description = "add, import, export or refresh")
    ),
    responses(
        (status = 200, description = "Action outcome", body = ActionOutcome),
        (status = 400, description = "Unknown action")
    )
)]
pub async fn quick_action(
    State(state): State<WorkbenchHandlerState>,
    ctx: TenantContext,
    Path((id, action)): Path<(Uuid, String)>,
) -> ApiResult<Json<ActionOutcome>> {
    let action = action.parse::<QuickAction>()?;
    Ok(Json(state.workbenches.quick_action(&viewer(&ctx), id, action)?))
}
