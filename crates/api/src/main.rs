use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use kalamari_core::calendar::CalendarService;
use kalamari_db::memory::{MemoryEventGroupStore, MemoryTemplateStore};
use kalamari_db::store::{EventGroupStore, PgEventGroupStore, PgTemplateStore, TemplateStore};
use kalamari_google::GoogleCalendarApi;
use tokio::sync::Notify;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kalamari_api::config::{ServerConfig, StoreBackend};
use kalamari_api::router::build_app_router;
use kalamari_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        store = ?config.store_backend,
        "Loaded server configuration"
    );

    // --- Stores ---
    let (templates, event_groups) = build_stores(config.store_backend).await;

    // --- Calendar service ---
    let calendar: Arc<dyn CalendarService> = Arc::new(
        GoogleCalendarApi::new(
            config.google_calendar_api_url.clone(),
            config.google_tasks_api_url.clone(),
            Duration::from_secs(config.external_request_timeout_secs),
        )
        .expect("Failed to build calendar HTTP client"),
    );
    tracing::info!(
        calendar_api = %config.google_calendar_api_url,
        tasks_api = %config.google_tasks_api_url,
        "Calendar client ready"
    );

    // --- App state ---
    let state = AppState {
        templates,
        event_groups,
        calendar,
        config: Arc::new(config.clone()),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let stop = Arc::new(Notify::new());
    let stop_rx = Arc::clone(&stop);
    let mut server = tokio::spawn(
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { stop_rx.notified().await })
            .into_future(),
    );

    tokio::select! {
        result = &mut server => {
            result
                .expect("Server task panicked")
                .expect("Server error");
            return;
        }
        () = shutdown_signal() => {}
    }

    // --- Drain ---
    stop.notify_one();
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    match tokio::time::timeout(drain, server).await {
        Ok(_) => tracing::info!("Graceful shutdown complete"),
        Err(_) => tracing::warn!(
            timeout_secs = config.shutdown_timeout_secs,
            "In-flight requests did not drain in time, exiting"
        ),
    }
}

/// Install the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kalamari_api=debug,tower_http=debug".into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Construct the template and event-group stores for the chosen backend.
async fn build_stores(
    backend: StoreBackend,
) -> (Arc<dyn TemplateStore>, Arc<dyn EventGroupStore>) {
    match backend {
        StoreBackend::Postgres => {
            let database_url =
                std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

            let pool = kalamari_db::create_pool(&database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            kalamari_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            kalamari_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            let templates: Arc<dyn TemplateStore> = Arc::new(PgTemplateStore::new(pool.clone()));
            let event_groups: Arc<dyn EventGroupStore> = Arc::new(PgEventGroupStore::new(pool));
            (templates, event_groups)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory stores; data is lost on restart");
            let templates: Arc<dyn TemplateStore> = Arc::new(MemoryTemplateStore::new());
            let event_groups: Arc<dyn EventGroupStore> = Arc::new(MemoryEventGroupStore::new());
            (templates, event_groups)
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
