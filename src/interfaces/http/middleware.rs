//! Session authentication and tenant resolution
//!
//! A session is a JWT carried either as `Authorization: Bearer <jwt>` or in
//! the `session` cookie. Every failure answers 401 `{"error":"Unauthorized"}`.

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use super::common::ApiError;
use crate::domain::UserRole;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims};

pub const SESSION_COOKIE: &str = "session";
pub const TENANT_HEADER: &str = "x-tenant-id";

#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Caller identity taken from a verified session token
#[derive(Clone, Debug, PartialEq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
    /// Tenant claim of the token
    pub tenant_id: String,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            tenant_id: claims.tenant,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.can_manage_users()
    }
}

fn bearer_token(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn session_token(headers: &axum::http::HeaderMap) -> Option<String> {
    bearer_token(headers).or_else(|| {
        CookieJar::from_headers(headers)
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty())
    })
}

/// Rejects requests without a valid session and stores the
/// [`AuthenticatedUser`] in the request extensions.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = session_token(request.headers()) else {
        return ApiError::unauthorized().into_response();
    };

    match verify_token(&token, &auth_state.jwt_config) {
        Ok(claims) => {
            request
                .extensions_mut()
                .insert(AuthenticatedUser::from_claims(claims));
            next.run(request).await
        }
        Err(e) => {
            debug!(error = %e, "Rejected session token");
            ApiError::unauthorized().into_response()
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(ApiError::unauthorized)
    }
}

/// Caller plus the tenant the request acts on
///
/// The tenant is the `X-Tenant-Id` header when present and non-empty,
/// otherwise the token's tenant claim. A header naming a tenant other than
/// the claim is rejected with 403.
#[derive(Clone, Debug, PartialEq)]
pub struct TenantContext {
    pub user: AuthenticatedUser,
    pub tenant_id: String,
}

impl<S: Send + Sync> FromRequestParts<S> for TenantContext {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        let from_header = parts
            .headers
            .get(TENANT_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from);

        if let Some(requested) = from_header.as_deref() {
            if requested != user.tenant_id {
                debug!(
                    user_id = %user.user_id,
                    claim = %user.tenant_id,
                    requested,
                    "Tenant header does not match session"
                );
                return Err(ApiError::forbidden("Tenant not accessible"));
            }
        }

        let tenant_id = from_header
            .or_else(|| Some(user.tenant_id.clone()).filter(|t| !t.is_empty()))
            .ok_or_else(|| ApiError::bad_request("Tenant context required"))?;

        Ok(Self { user, tenant_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    use crate::infrastructure::crypto::jwt::create_token;

    async fn whoami(ctx: TenantContext) -> String {
        format!("{}@{}", ctx.user.user_id, ctx.tenant_id)
    }

    fn app(config: JwtConfig) -> Router {
        let auth = AuthState { jwt_config: config };
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(auth, auth_middleware))
    }

    fn token(tenant: &str, config: &JwtConfig) -> String {
        let user = crate::testing::sample_user("u-1", tenant, "Ann", UserRole::Admin);
        create_token(&user, config).unwrap()
    }

    async fn call(req: Request<Body>) -> (StatusCode, String) {
        let response = app(JwtConfig::default()).oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn missing_session_is_unauthorized() {
        let (status, body) = call(Request::get("/whoami").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"error":"Unauthorized"}"#);
    }

    #[tokio::test]
    async fn bad_signature_is_unauthorized() {
        let other = JwtConfig {
            secret: "another-secret".into(),
            ..JwtConfig::default()
        };
        let req = Request::get("/whoami")
            .header("authorization", format!("Bearer {}", token("acme", &other)))
            .body(Body::empty())
            .unwrap();
        assert_eq!(call(req).await.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn bearer_uses_tenant_claim() {
        let req = Request::get("/whoami")
            .header("authorization", format!("Bearer {}", token("acme", &JwtConfig::default())))
            .body(Body::empty())
            .unwrap();
        assert_eq!(call(req).await, (StatusCode::OK, "u-1@acme".to_string()));
    }

    #[tokio::test]
    async fn cookie_session_with_matching_header() {
        let req = Request::get("/whoami")
            .header("cookie", format!("session={}", token("acme", &JwtConfig::default())))
            .header("x-tenant-id", " acme ")
            .body(Body::empty())
            .unwrap();
        assert_eq!(call(req).await, (StatusCode::OK, "u-1@acme".to_string()));
    }

    #[tokio::test]
    async fn foreign_tenant_header_is_forbidden() {
        let req = Request::get("/whoami")
            .header("cookie", format!("session={}", token("acme", &JwtConfig::default())))
            .header("x-tenant-id", "globex")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(req).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, r#"{"error":"Tenant not accessible"}"#);
    }

    #[tokio::test]
    async fn tenantless_token_cannot_pick_a_tenant() {
        let req = Request::get("/whoami")
            .header("authorization", format!("Bearer {}", token("", &JwtConfig::default())))
            .header("x-tenant-id", "acme")
            .body(Body::empty())
            .unwrap();
        assert_eq!(call(req).await.0, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn missing_tenant_is_bad_request() {
        let req = Request::get("/whoami")
            .header("authorization", format!("Bearer {}", token("", &JwtConfig::default())))
            .header("x-tenant-id", "  ")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"error":"Tenant context required"}"#);
    }

    #[test]
    fn session_token_prefers_bearer() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert("cookie", "session=from-cookie".parse().unwrap());
        assert_eq!(session_token(&headers).as_deref(), Some("from-cookie"));
        headers.insert("authorization", "Bearer from-header".parse().unwrap());
        assert_eq!(session_token(&headers).as_deref(), Some("from-header"));
    }
}
