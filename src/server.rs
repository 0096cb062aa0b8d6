//! Server runtime
//!
//! [`ServerHandle`] owns the whole lifecycle: metrics recorder, database and
//! migrations, default admin, services, the HTTP listener and graceful
//! shutdown.

use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::application::{
    start_idle_sweeper, DocumentSigningService, UserService, WorkbenchRegistry, WorkbenchService,
};
use crate::config::AppConfig;
use crate::domain::{ESignService, RepositoryProvider};
use crate::infrastructure::{
    init_database, run_migrations, CmsClient, HttpESignClient, SeaOrmRepositoryProvider,
};
use crate::interfaces::http::{create_api_router, AppState};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup
    pub auto_migrate: bool,
    /// Seed the configured admin when no users exist
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

/// The global recorder can be installed once per process; later starts reuse it.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();
    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!(error = %e, "Prometheus recorder unavailable, /metrics disabled");
                None
            }
        })
        .clone()
}

pub struct ServerHandle {
    pub repos: Arc<dyn RepositoryProvider>,
    pub cms: Arc<CmsClient>,
    pub config: AppConfig,
    /// Port actually bound, useful when the config asked for 0
    pub port: u16,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;
        info!("Starting Admin Workbench...");

        let metrics_handle = prometheus_handle();

        // ── Database ───────────────────────────────────────────
        let db = init_database(&app_cfg.database_config()).await?;
        if opts.auto_migrate {
            run_migrations(&db).await?;
        }

        // ── Repositories & services ────────────────────────────
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let jwt_config = app_cfg.jwt_config();
        info!(hours = jwt_config.expiration_hours, "JWT sessions configured");

        let users = Arc::new(UserService::new(repos.clone(), jwt_config.clone()));
        if opts.create_default_admin {
            match users.ensure_default_admin(&app_cfg.default_admin()).await {
                Ok(Some(admin)) => info!(email = %admin.email, "Default admin seeded"),
                Ok(None) => {}
                Err(e) => error!(error = %e, "Failed to seed default admin"),
            }
        }

        if app_cfg.esign.api_key.is_empty() {
            warn!("esign.api_key is empty, signing service calls will be rejected upstream");
        }
        let esign: Arc<dyn ESignService> = Arc::new(HttpESignClient::new(app_cfg.esign_config())?);
        let signing = Arc::new(DocumentSigningService::new(repos.clone(), esign));

        let cms = Arc::new(CmsClient::new(app_cfg.cms_config())?);
        info!(enabled = cms.is_enabled(), "CMS client ready");

        let registry = Arc::new(WorkbenchRegistry::with_limit(app_cfg.workbench.max_per_user));
        let workbenches = Arc::new(WorkbenchService::new(
            repos.clone(),
            registry.clone(),
            cms.subscribe(),
        ));

        // ── HTTP ───────────────────────────────────────────────
        let router = create_api_router(AppState {
            db: db.clone(),
            jwt_config,
            users,
            signing,
            workbenches,
            registry: registry.clone(),
            cms: cms.clone(),
            started_at: Arc::new(Instant::now()),
            metrics_handle,
        });

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        start_idle_sweeper(
            registry,
            shutdown.signal(),
            Duration::from_secs(app_cfg.workbench.sweep_interval_secs),
            Duration::from_secs(app_cfg.workbench.idle_timeout_secs),
        );
        let listener = tokio::net::TcpListener::bind(app_cfg.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_shutdown = shutdown.signal();
        let api_task = tokio::spawn(async move {
            let server = axum::serve(listener, router).with_graceful_shutdown(async move {
                api_shutdown.wait().await;
                info!("REST API server received shutdown signal");
            });
            if let Err(e) = server.await {
                error!(error = %e, "REST API server error");
            }
        });

        Ok(Self {
            repos,
            cms,
            config: app_cfg,
            port: local_addr.port(),
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Trigger shutdown on SIGTERM / SIGINT
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the listener to drain, bounded by `server.shutdown_timeout`,
    /// then close the database.
    pub async fn wait(self) {
        let Self {
            api_task,
            shutdown,
            db,
            ..
        } = self;

        let drained = shutdown
            .run_cleanup(|| async move {
                if let Err(e) = api_task.await {
                    error!(error = %e, "REST API server task panicked");
                }
            })
            .await;
        if !drained {
            warn!("In-flight requests did not finish before the shutdown timeout");
        }

        if let Err(e) = db.close().await {
            warn!(error = %e, "Error closing database connection");
        } else {
            info!("Database connection closed");
        }
        info!("Admin Workbench shutdown complete");
    }

    pub async fn shutdown(self) {
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Install the global subscriber from `[logging]`; `RUST_LOG` overrides the level.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let result = if config.logging.format.eq_ignore_ascii_case("json") {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing already initialised: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".into();
        config.server.port = 0;
        config.server.shutdown_timeout = 5;
        let db_path = std::env::temp_dir().join(format!("admin-workbench-{}.db", uuid::Uuid::new_v4()));
        config.database.path = db_path.to_string_lossy().into_owned();
        config
    }

    #[tokio::test]
    async fn starts_seeds_admin_and_shuts_down() {
        let handle = ServerHandle::start(ServerOptions {
            config: test_config(),
            ..ServerOptions::default()
        })
        .await
        .unwrap();
        assert_ne!(handle.port, 0);
        assert!(handle.is_running());
        assert_eq!(handle.repos.users().count().await.unwrap(), 1);

        let url = format!("http://127.0.0.1:{}/health", handle.port);
        let response = reqwest::get(url).await.unwrap();
        assert!(response.status().is_success());

        let db_path = handle.config.database.path.clone();
        handle.shutdown().await;
        let _ = std::fs::remove_file(db_path);
    }
}
