//! User directory handlers
//!
//! Every query is scoped to the tenant resolved for the request.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{ChangeRoleRequest, ListUsersParams, UserDto};
use crate::application::identity::{Actor, UserService, UsersOverview};
use crate::interfaces::http::common::{ApiResponse, ApiResult, PaginatedResponse, ValidatedJson};
use crate::interfaces::http::middleware::TenantContext;

#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ListUsersParams),
    responses(
        (status = 200, description = "Filtered page of users", body = PaginatedResponse<UserDto>),
        (status = 400, description = "Unknown filter value or missing tenant"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    ctx: TenantContext,
    Query(params): Query<ListUsersParams>,
) -> ApiResult<Json<PaginatedResponse<UserDto>>> {
    let query = params.into_query()?;
    let page = state.user_service.list_users(&ctx.tenant_id, query).await?;
    Ok(Json(PaginatedResponse::from_result(page, UserDto::from)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/overview",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Overview cards and sidebar quick stats", body = ApiResponse<UsersOverview>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn users_overview(
    State(state): State<UserHandlerState>,
    ctx: TenantContext,
) -> ApiResult<Json<ApiResponse<UsersOverview>>> {
    let overview = state.user_service.overview(&ctx.tenant_id).await?;
    Ok(Json(ApiResponse::success(overview)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    let user = state.user_service.get_user(&ctx.tenant_id, &id).await?;
    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}/role",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Role changed", body = ApiResponse<UserDto>),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Not found")
    )
)]
pub async fn change_user_role(
    State(state): State<UserHandlerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<ChangeRoleRequest>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    let actor = Actor {
        user_id: ctx.user.user_id,
        tenant_id: ctx.tenant_id,
        role: ctx.user.role,
    };
    let user = state
        .user_service
        .change_role(&actor, &id, request.role)
        .await?;
    Ok(Json(ApiResponse::success(UserDto::from(user))))
}
