//! # Vault API Server
//!
//! ```text
//! init tracing ─► load config ─► open pool + bootstrap schema ─► serve
//!                                                                  │
//!           close pool ◄─ drain (root ctx cancelled after grace) ◄─┘ SIGINT/SIGTERM
//! ```

use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{error, info, warn};

use vault_api::{init_tracing, router, ApiConfig, AppState};
use vault_db::{CancelHandle, Database, RequestContext};
use vault_usecase::ItemUsecase;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Vault API server...");

    let config = ApiConfig::load()?;
    info!(
        addr = %config.bind_address(),
        db_path = %config.database_path.display(),
        request_timeout_ms = config.request_timeout_ms,
        "Configuration loaded"
    );

    let db = Database::new(config.db_config()).await?;
    info!("Database ready");

    let (root, cancel) = RequestContext::cancellable();
    let state = AppState::new(
        ItemUsecase::new(db.items()),
        root,
        config.request_timeout(),
    );
    let app = router(state);

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!(addr = %config.bind_address(), "Starting HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel, config.shutdown_grace()))
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM, then gives in-flight requests `grace` to
/// finish before cancelling their storage calls.
async fn shutdown_signal(cancel: CancelHandle, grace: Duration) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(grace_ms = grace.as_millis() as u64, "Shutdown signal received, draining requests...");

    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        warn!("Grace period over, cancelling in-flight requests");
        cancel.cancel();
    });
}
