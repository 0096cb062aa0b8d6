//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::middleware::{auth_middleware, AuthState};
use super::modules::{auth, cms, documents, health, metrics, request_id, users, workbench};
use crate::application::identity::UsersOverview;
use crate::application::workbench::{
    ActionOutcome, QuickAction, SavedView, SelectionCommand, WorkbenchSnapshot,
};
use crate::application::{
    DocumentSigningService, SharedWorkbenchRegistry, UserService, WorkbenchService,
};
use crate::domain::{
    DateRange, Signer, SignerStatus, SigningStatus, UserFilters, UserRole, UserStatus,
};
use crate::infrastructure::cms::CmsClient;
use crate::infrastructure::crypto::JwtConfig;

/// Everything the handlers need. Each module extracts its own slice via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_config: JwtConfig,
    pub users: Arc<UserService>,
    pub signing: Arc<DocumentSigningService>,
    pub workbenches: Arc<WorkbenchService>,
    pub registry: SharedWorkbenchRegistry,
    pub cms: Arc<CmsClient>,
    pub started_at: Arc<Instant>,
    /// `/metrics` is only served when a recorder is installed
    pub metrics_handle: Option<PrometheusHandle>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(s: &AppState) -> Self {
        AuthState {
            jwt_config: s.jwt_config.clone(),
        }
    }
}

impl FromRef<AppState> for auth::AuthHandlerState {
    fn from_ref(s: &AppState) -> Self {
        auth::AuthHandlerState {
            user_service: Arc::clone(&s.users),
        }
    }
}

impl FromRef<AppState> for users::UserHandlerState {
    fn from_ref(s: &AppState) -> Self {
        users::UserHandlerState {
            user_service: Arc::clone(&s.users),
        }
    }
}

impl FromRef<AppState> for documents::DocumentHandlerState {
    fn from_ref(s: &AppState) -> Self {
        documents::DocumentHandlerState {
            signing: Arc::clone(&s.signing),
        }
    }
}

impl FromRef<AppState> for workbench::WorkbenchHandlerState {
    fn from_ref(s: &AppState) -> Self {
        workbench::WorkbenchHandlerState {
            workbenches: Arc::clone(&s.workbenches),
        }
    }
}

impl FromRef<AppState> for cms::CmsHandlerState {
    fn from_ref(s: &AppState) -> Self {
        cms::CmsHandlerState {
            cms: Arc::clone(&s.cms),
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        health::HealthState {
            db: s.db.clone(),
            workbenches: s.registry.clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "JWT from /api/v1/auth/login. Browsers may send the `session` cookie instead.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::logout,
        auth::me,
        users::list_users,
        users::users_overview,
        users::get_user,
        users::change_user_role,
        documents::get_signing,
        documents::cancel_signing,
        workbench::mount_workbench,
        workbench::get_workbench,
        workbench::unmount_workbench,
        workbench::apply_selection,
        workbench::replace_filters,
        workbench::reset_filters,
        workbench::apply_view,
        workbench::change_role,
        workbench::view_profile,
        workbench::toggle_sidebar,
        workbench::close_sidebar,
        workbench::quick_action,
        cms::get_content,
        cms::set_enabled,
    ),
    components(
        schemas(
            health::HealthResponse,
            health::DatabaseHealth,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::SessionUser,
            users::UserDto,
            users::ChangeRoleRequest,
            UsersOverview,
            UserRole,
            UserStatus,
            UserFilters,
            DateRange,
            documents::SigningStatusResponse,
            documents::CancelResponse,
            SigningStatus,
            Signer,
            SignerStatus,
            WorkbenchSnapshot,
            SelectionCommand,
            SavedView,
            QuickAction,
            ActionOutcome,
            cms::CmsContentResponse,
            cms::CmsToggle,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and database readiness"),
        (name = "Authentication", description = "Login, logout and session introspection"),
        (name = "Users", description = "Tenant-scoped user directory"),
        (name = "Documents", description = "E-signature sessions of stored documents"),
        (name = "Workbench", description = "Mounted admin users pages: selection, filters, views, role changes"),
        (name = "CMS", description = "Visual CMS slot content"),
    ),
    info(
        title = "Admin Workbench API",
        version = "1.0.0",
        description = "Multi-tenant admin back office: user directory, workbench state and document e-signature",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the full HTTP application
pub fn create_api_router(state: AppState) -> Router {
    let auth_layer = middleware::from_fn_with_state(AuthState::from_ref(&state), auth_middleware);

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/v1/auth/me", get(auth::me))
        // Directory
        .route("/api/v1/users", get(users::list_users))
        .route("/api/v1/users/overview", get(users::users_overview))
        .route("/api/v1/users/{id}", get(users::get_user))
        .route("/api/v1/users/{id}/role", patch(users::change_user_role))
        // E-signature
        .route(
            "/api/documents/{id}/esign/{session_id}",
            get(documents::get_signing).delete(documents::cancel_signing),
        )
        // Workbench
        .route("/api/v1/workbench", post(workbench::mount_workbench))
        .route(
            "/api/v1/workbench/{id}",
            get(workbench::get_workbench).delete(workbench::unmount_workbench),
        )
        .route("/api/v1/workbench/{id}/selection", post(workbench::apply_selection))
        .route("/api/v1/workbench/{id}/filters", put(workbench::replace_filters))
        .route("/api/v1/workbench/{id}/filters/reset", post(workbench::reset_filters))
        .route("/api/v1/workbench/{id}/views/{view}", post(workbench::apply_view))
        .route("/api/v1/workbench/{id}/users/{user_id}", get(workbench::view_profile))
        .route("/api/v1/workbench/{id}/users/{user_id}/role", post(workbench::change_role))
        .route("/api/v1/workbench/{id}/sidebar/toggle", post(workbench::toggle_sidebar))
        .route("/api/v1/workbench/{id}/sidebar/close", post(workbench::close_sidebar))
        .route("/api/v1/workbench/{id}/actions/{action}", post(workbench::quick_action))
        // CMS
        .route("/api/v1/cms/enabled", put(cms::set_enabled))
        .route("/api/v1/cms/{model}", get(cms::get_content))
        .layer(auth_layer)
        .with_state(state.clone());

    let mut router = Router::new().merge(public_routes).merge(protected_routes);

    if let Some(handle) = state.metrics_handle.clone() {
        let metrics_routes = Router::new()
            .route("/metrics", get(metrics::prometheus_metrics))
            .with_state(metrics::MetricsState {
                handle,
                workbenches: state.registry.clone(),
            });
        router = router.merge(metrics_routes);
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .route_layer(middleware::from_fn(metrics::http_metrics_middleware))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors)
}
