//! Login, logout and session introspection
//!
//! The JWT is returned in the body and also set as the HttpOnly `session`
//! cookie so browser clients need no token handling.

use std::sync::Arc;

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::dto::{LoginRequest, LoginResponse, SessionUser};
use crate::application::identity::UserService;
use crate::interfaces::http::common::{ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::{AuthenticatedUser, SESSION_COOKIE};

#[derive(Clone)]
pub struct AuthHandlerState {
    pub user_service: Arc<UserService>,
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<(CookieJar, Json<ApiResponse<LoginResponse>>)> {
    let result = state
        .user_service
        .login(&request.email, &request.password)
        .await?;

    let response = LoginResponse {
        token: result.token.clone(),
        token_type: result.token_type,
        expires_in: result.expires_in,
        user: SessionUser {
            id: result.user.id,
            email: result.user.email,
            role: result.user.role,
            tenant_id: result.user.tenant_id,
        },
    };

    Ok((jar.add(session_cookie(result.token)), Json(ApiResponse::success(response))))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Authentication",
    responses((status = 200, description = "Session cookie cleared"))
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<ApiResponse<()>>) {
    let removal = Cookie::build(SESSION_COOKIE).path("/");
    (jar.remove(removal), Json(ApiResponse::success(())))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current session", body = ApiResponse<SessionUser>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn me(user: AuthenticatedUser) -> Json<ApiResponse<SessionUser>> {
    Json(ApiResponse::success(SessionUser {
        id: user.user_id,
        email: user.email,
        role: user.role,
        tenant_id: user.tenant_id,
    }))
}
