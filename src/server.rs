//! Server runtime
//!
//! [`ServerHandle`] owns the full lifecycle: database, migrations, admin
//! seeding, service wiring, the REST API listener and graceful shutdown.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::application::{
    AppointmentService, GuestProvisioner, ListingService, NewUser, Notifier, QuoteService,
    UserService,
};
use crate::config::AppConfig;
use crate::domain::{RepositoryProvider, UserRole};
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use crate::infrastructure::database::{init_database, run_migrations};
use crate::infrastructure::mail::{HttpMailer, LogMailer, MailError, Mailer};
use crate::infrastructure::storage::MediaStorage;
use crate::interfaces::http::{create_api_router, ApiContext};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

// ── Tracing ────────────────────────────────────────────────────────

/// Install the global subscriber. `RUST_LOG` wins over `logging.level`.
/// Calling it twice is harmless.
pub fn init_tracing(cfg: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let result = if cfg.logging.is_json() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
    };

    if result.is_err() {
        warn!("Tracing subscriber already installed");
    }
}

/// The global recorder can only be installed once per process, so restarts
/// within one process reuse it. `None` if another recorder already owns the slot.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static PROM_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("📊 Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!("Prometheus recorder unavailable, /metrics disabled: {}", e);
                None
            }
        })
        .clone()
}

// ── Wiring ─────────────────────────────────────────────────────────

/// Provider API client when a key is configured, otherwise a mailer that only logs.
pub fn build_mailer(cfg: &AppConfig) -> Result<Arc<dyn Mailer>, MailError> {
    match cfg.mail_api_key() {
        Some(key) => {
            info!(api_url = %cfg.mail.api_url, "📧 Sending mail through provider API");
            Ok(Arc::new(HttpMailer::new(
                cfg.mail.api_url.clone(),
                key.to_string(),
                cfg.mail.from.clone(),
            )?))
        }
        None => {
            warn!("📧 mail.api_key not set; outgoing mail is logged only");
            Ok(Arc::new(LogMailer))
        }
    }
}

/// Build services and the HTTP context on top of an open database.
pub fn build_api_context(
    db: DatabaseConnection,
    mailer: Arc<dyn Mailer>,
    cfg: &AppConfig,
    metrics_handle: Option<PrometheusHandle>,
) -> ApiContext {
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let ttl = cfg.security.activation_token_hours;
    let jwt_config = cfg.jwt_config();

    let notifier = Arc::new(Notifier::new(mailer, &cfg.mail.public_base_url, ttl));
    let provisioner = Arc::new(GuestProvisioner::new(repos.clone(), ttl));
    let media = MediaStorage::new(cfg.storage.upload_dir.clone(), &cfg.storage.public_path);

    ApiContext {
        db,
        jwt_config: jwt_config.clone(),
        user_service: Arc::new(UserService::new(
            repos.clone(),
            jwt_config,
            notifier.clone(),
            ttl,
        )),
        listing_service: Arc::new(ListingService::new(repos.clone(), media.clone())),
        appointment_service: Arc::new(AppointmentService::new(
            repos.clone(),
            provisioner.clone(),
            notifier.clone(),
        )),
        quote_service: Arc::new(QuoteService::new(repos, provisioner, notifier)),
        media,
        max_upload_bytes: cfg.storage.max_upload_bytes(),
        metrics_handle,
        started_at: Arc::new(Instant::now()),
    }
}

// ── Options ────────────────────────────────────────────────────────

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Seed the configured admin when no users exist (default: true).
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

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running API server.
///
/// ```rust,no_run
/// use dealership::server::{ServerHandle, ServerOptions};
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
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the API is bound to (port resolved when configured as 0).
    pub local_addr: SocketAddr,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// 1. install the Prometheus recorder
    /// 2. connect and migrate the database
    /// 3. seed the default admin
    /// 4. start the REST API (with Swagger UI and static media)
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;
        app_cfg.validate()?;

        info!("Starting dealership service v{}...", env!("CARGO_PKG_VERSION"));

        let prometheus_handle = prometheus_handle();

        // ── Database ───────────────────────────────────────────
        let db = init_database(&app_cfg.database_config()).await?;
        if opts.auto_migrate {
            run_migrations(&db).await?;
        }

        // ── Services ───────────────────────────────────────────
        let mailer = build_mailer(&app_cfg)?;
        let ctx = build_api_context(db.clone(), mailer, &app_cfg, prometheus_handle);

        ctx.media.ensure_root().await?;
        info!(
            upload_dir = %ctx.media.root().display(),
            public_path = %ctx.media.public_path(),
            "Media storage ready"
        );

        if opts.create_default_admin {
            seed_default_admin(&ctx, &app_cfg).await;
        }

        // ── REST API server ────────────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        let api_router = create_api_router(ctx);

        let api_addr = format!("{}:{}", app_cfg.server.api_host, app_cfg.server.api_port);
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_server = axum::serve(
            listener,
            api_router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            shutdown_signal.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        info!("🚀 Server started.");

        Ok(Self {
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

    /// Trigger shutdown on SIGTERM / SIGINT.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the API to drain (bounded by `server.shutdown_timeout`), then
    /// close the database.
    pub async fn wait(self) {
        info!("⏳ Waiting for in-flight requests...");

        match tokio::time::timeout(self.shutdown.timeout(), self.api_task).await {
            Ok(Ok(())) => info!("REST API server stopped"),
            Ok(Err(e)) => error!("REST API server task panicked: {}", e),
            Err(_) => warn!(
                "REST API server did not stop within {}s",
                self.shutdown.timeout().as_secs()
            ),
        }

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("✅ Database connection closed");
        }

        info!("👋 Shutdown complete");
    }

    pub async fn shutdown(self) {
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

async fn seed_default_admin(ctx: &ApiContext, app_cfg: &AppConfig) {
    let admin = &app_cfg.admin;
    let result = ctx
        .user_service
        .ensure_default_admin(NewUser {
            email: admin.email.clone(),
            password: admin.password.clone(),
            first_name: admin.first_name.clone(),
            last_name: admin.last_name.clone(),
            phone: None,
            role: UserRole::Admin,
        })
        .await;

    match result {
        Ok(Some(user)) => {
            warn!(email = %user.email, "Default admin created; change its password");
        }
        Ok(None) => {}
        Err(e) => error!("Failed to create default admin: {}", e),
    }
}
