//! # vault-db: Storage Layer for Vault
//!
//! This crate owns the storage capability interface, its SQLite
//! implementation and every SQL statement Vault runs.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Vault Data Flow                                │
//! │                                                                         │
//! │  ItemUsecase (vault-usecase)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     vault-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  Repository   │    │   Storage     │    │   Schema     │  │   │
//! │  │   │  (item.rs)    │───►│   (trait)     │◄───│  (init.sql)  │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │ impl                          │   │
//! │  │                        ┌───────▼───────┐    ┌──────────────┐  │   │
//! │  │                        │   Database    │    │RequestContext│  │   │
//! │  │                        │  (pool.rs)    │    │ deadline +   │  │   │
//! │  │                        │  SqlitePool   │    │ cancellation │  │   │
//! │  │                        └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (VAULT_DATABASE_PATH)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`storage`] - The `Storage` trait, values and rows
//! - [`pool`] - SQLite pool configuration and the `Database` driver
//! - [`schema`] - Schema bootstrap from `sql/init.sql`
//! - [`context`] - Request deadline and cancellation
//! - [`error`] - Storage error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vault_db::{Database, DbConfig, RequestContext};
//!
//! let db = Database::new(DbConfig::new("vault.db")).await?;
//! let ctx = RequestContext::background();
//!
//! let items = db.items().find_all(&ctx).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod context;
pub mod error;
pub mod pool;
pub mod repository;
pub mod schema;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use context::{CancelHandle, RequestContext};
pub use error::{StorageError, StorageResult};
pub use pool::{Database, DbConfig};
pub use schema::{BootstrapReport, SchemaSource};
pub use storage::{ExecResult, FromRow, FromValue, Row, Rows, Storage, Value};

// Repository re-exports for convenience
pub use repository::item::ItemRepository;
