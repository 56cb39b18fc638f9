//! Reusable server runtime.
//!
//! Provides [`ServerHandle`] that encapsulates the full server lifecycle:
//! database init, migrations, default admin, optional demo data, REST API,
//! metrics, and graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::application::identity::DefaultAdmin;
use crate::application::seed::seed_demo_data;
use crate::application::{
    create_event_bus, AnalyticsService, ComplaintService, SharedEventBus, UserService,
};
use crate::config::{AppConfig, ConfigError};
use crate::domain::repositories::RepositoryProvider;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use crate::infrastructure::init_database;
use crate::interfaces::http::modules::metrics::install_recorder;
use crate::interfaces::{create_api_router, ApiDependencies};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::shared::DomainError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("Failed to install metrics recorder: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("Startup task failed: {0}")]
    Startup(#[from] DomainError),
}

// ── Options ────────────────────────────────────────────────────────

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Create the configured admin when the users table is empty (default: true).
    pub create_default_admin: bool,
    /// Insert demo technicians, customers and complaints (default: `seed.demo_data`).
    pub seed_demo: bool,
}

impl ServerOptions {
    pub fn new(config: AppConfig) -> Self {
        Self {
            seed_demo: config.seed.demo_data,
            config,
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running server.
///
/// # Examples
///
/// ```rust,no_run
/// use complaint_desk::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub event_bus: SharedEventBus,
    pub repos: Arc<dyn RepositoryProvider>,
    pub config: AppConfig,
    /// Address the API is listening on
    pub local_addr: SocketAddr,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the service.
    ///
    /// 1. Install the Prometheus recorder
    /// 2. Connect to the database and run migrations
    /// 3. Create the default admin and demo data (if enabled)
    /// 4. Start the REST API (with Swagger UI and the notification socket)
    pub async fn start(opts: ServerOptions) -> Result<Self, ServerError> {
        let app_cfg = opts.config;

        info!("Starting Complaint Desk...");

        let jwt_config = app_cfg.jwt_config()?;
        info!(
            expires_in_secs = jwt_config.expiration_secs,
            "JWT configured"
        );

        let prometheus_handle = install_recorder()?;

        // ── Database ───────────────────────────────────────────
        let db = init_database(&app_cfg.database_config()).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        // ── Repositories & Services ────────────────────────────
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let event_bus = create_event_bus();

        let users = Arc::new(UserService::new(
            repos.clone(),
            jwt_config,
            app_cfg.security.bcrypt_cost,
        ));
        let complaints = Arc::new(ComplaintService::new(repos.clone(), event_bus.clone()));
        let analytics = Arc::new(AnalyticsService::new(repos.clone()));

        if opts.create_default_admin {
            users
                .ensure_default_admin(&DefaultAdmin {
                    name: app_cfg.admin.name.clone(),
                    email: app_cfg.admin.email.clone(),
                    password: app_cfg.admin.password.clone(),
                })
                .await?;
        }

        if opts.seed_demo && seed_demo_data(&users, &complaints).await? {
            info!("Demo data inserted");
        }

        // ── REST API server ────────────────────────────────────
        let api_router = create_api_router(ApiDependencies {
            db: db.clone(),
            users,
            complaints,
            analytics,
            event_bus: event_bus.clone(),
            metrics: prometheus_handle,
            cors_origins: app_cfg.cors.allowed_origins.clone(),
        });

        let addr = app_cfg.address();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let api_shutdown = shutdown.signal();
        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            event_bus,
            repos,
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for in-flight requests, up to the shutdown timeout, then close the pool.
    pub async fn wait(self) {
        info!("Waiting for server tasks to complete...");

        let timeout = Duration::from_secs(self.shutdown.timeout_secs());
        match tokio::time::timeout(timeout, self.api_task).await {
            Ok(Ok(())) => info!("REST API server stopped"),
            Ok(Err(e)) => error!("REST API server task panicked: {}", e),
            Err(_) => warn!(
                timeout_secs = timeout.as_secs(),
                "Shutdown timeout elapsed with requests still in flight"
            ),
        }

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("Database connection closed");
        }

        info!("Complaint Desk shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

/// Initialize tracing (logging) from the application config.
///
/// `RUST_LOG` wins over `logging.level`. Call once at process startup.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
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
        config.database.url = "sqlite::memory:".into();
        config.database.max_connections = 1;
        config.security.bcrypt_cost = 4;
        config
    }

    #[tokio::test]
    async fn starts_seeds_and_stops() {
        let mut opts = ServerOptions::new(test_config());
        opts.seed_demo = true;

        let handle = ServerHandle::start(opts).await.unwrap();
        assert!(handle.is_running());
        assert_ne!(handle.local_addr.port(), 0);

        let admin = handle
            .repos
            .users()
            .get_user_by_email("admin@example.com")
            .await
            .unwrap();
        assert!(admin.is_some());
        assert!(handle.repos.users().count_users().await.unwrap() > 1);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn bad_expiry_fails_startup() {
        let mut config = test_config();
        config.security.jwt_expiration = "soon".into();

        let result = ServerHandle::start(ServerOptions::new(config)).await;
        assert!(matches!(result, Err(ServerError::Config(_))));
    }
}
