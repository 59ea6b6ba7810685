//! # Vault API
//!
//! HTTP server for item records.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Vault API                                     │
//! │                                                                         │
//! │  Client ──► axum Router ──► log_requests (request_id, elapsed_ms)      │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │             items / health handlers                                    │
//! │                  │   ctx = root.with_timeout(request_timeout)          │
//! │                  ▼                                                      │
//! │             ItemUsecase<Database> ──► SQLite                           │
//! │                  │                                                      │
//! │                  ▼                                                      │
//! │             ItemError ──► ApiError { code, message } + status          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `VAULT_CONFIG` - Optional TOML file with the same keys
//! - `VAULT_BIND_ADDR` - Listen address (default: 0.0.0.0)
//! - `VAULT_HTTP_PORT` - HTTP port (default: 8080)
//! - `VAULT_DATABASE_PATH` - SQLite file (default: ./vault.db)
//! - `VAULT_SCHEMA_PATH` - Schema script override (default: embedded)
//! - `VAULT_DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `VAULT_REQUEST_TIMEOUT_MS` - Per-request deadline (default: 5000)
//! - `VAULT_SHUTDOWN_GRACE_MS` - Drain time after a signal (default: 10000)
//! - `RUST_LOG` - Log filter (default: `info,vault=debug,sqlx=warn`)

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use tracing_subscriber::EnvFilter;

// Re-exports
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use routes::router;
pub use state::AppState;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,vault=debug,sqlx=warn";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=vault_db=trace` - Trace the storage layer only
/// - Default: [`DEFAULT_LOG_FILTER`]
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // A subscriber may already be installed (tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
