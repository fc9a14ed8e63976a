//! # Kontroll Sync Worker
//!
//! Scheduler and webhook service for the platform sync jobs.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Sync Worker                                     │
//! │                                                                         │
//! │  Schedule ──► catalog / stock_levels / purchase_orders jobs            │
//! │  Webhook  ──► sales_orders job                                         │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │  ERP API ◄──► jobs ◄──► Field-service API                              │
//! │                     │                                                   │
//! │                     ├──► SQLite (purchase-order snapshot)              │
//! │                     └──► Redis (pub/sub notifications)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod notifier;
mod scheduler;
mod secrets;
mod webhook;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kontroll_core::payloads::SalesOrderContext;
use kontroll_store::{Database, DbConfig};
use kontroll_sync::{InfraspeakClient, Notifier, UnleashedClient};

use crate::config::WorkerConfig;
use crate::notifier::{LogNotifier, RedisNotifier};
use crate::secrets::ApiCredentials;

/// Shared application state.
///
/// Constructed once at startup; every job run borrows from here instead of
/// creating its own clients.
pub struct AppState {
    pub config: WorkerConfig,
    pub db: Database,
    pub erp: UnleashedClient,
    pub field_service: InfraspeakClient,
    pub notifier: Arc<dyn Notifier>,
    pub sales_context: SalesOrderContext,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Kontroll sync worker...");

    // Load configuration and credentials
    let config = WorkerConfig::load()?;
    let credentials = ApiCredentials::load()?;
    info!(
        http_port = config.http_port,
        db_path = %config.database_path,
        "Configuration loaded"
    );

    // Open the snapshot store (creates the file and runs migrations)
    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Snapshot store ready");

    // Build the platform clients once; jobs borrow them per run
    let erp = UnleashedClient::new(
        &config.erp_base_url,
        credentials.api_id.clone(),
        credentials.api_key.clone(),
        config.erp_client_type.clone(),
    )?;
    let field_service = InfraspeakClient::new(
        &config.field_service_base_url,
        credentials.field_service_token.clone(),
        config.field_service_user_agent.clone(),
    )?;

    // Notification channel: Redis when configured, local log otherwise
    let notifier: Arc<dyn Notifier> = match config.redis_url.as_deref() {
        Some(redis_url) => {
            info!(channel = %config.notify_channel, "Publishing notifications to Redis");
            Arc::new(RedisNotifier::new(redis_url, config.notify_channel.clone())?)
        }
        None => {
            warn!("REDIS_URL not set, notifications will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let sales_context = SalesOrderContext {
        customer_code: config.sales_customer_code.clone(),
        salesperson_guid: config.sales_salesperson_guid.clone(),
        exchange_rate: config.sales_exchange_rate,
    };

    let state = Arc::new(AppState {
        config,
        db,
        erp,
        field_service,
        notifier,
        sales_context,
    });

    // Spawn the scheduled job loops
    let _schedules = scheduler::spawn_schedules(&state);

    // Serve the webhook listener until shutdown
    let addr: SocketAddr = format!("0.0.0.0:{}", state.config.http_port).parse()?;
    info!(%addr, "Starting webhook listener");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, webhook::router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.db.close().await;
    info!("Worker shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
