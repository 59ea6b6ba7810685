//! # Database Pool Management
//!
//! Connection pool creation and the SQLite implementation of [`Storage`].
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  vault-api startup                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path) ← Configure pool settings                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + bootstrap schema          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       │ One tokio task per HTTP request                                │
//! │       ▼                                                                 │
//! │  Request 1 ──► ctx.run(execute) ──► Conn1                              │
//! │  Request 2 ──► ctx.run(query)   ──► Conn2                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! File databases use WAL so readers and writers don't block each other.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::query::Query;
use sqlx::sqlite::{
    SqliteArguments, SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow,
    SqliteSynchronous,
};
use sqlx::{Row as _, Sqlite, SqlitePool, TypeInfo, ValueRef};
use tracing::{debug, info};

use crate::context::RequestContext;
use crate::error::{StorageError, StorageResult};
use crate::repository::item::ItemRepository;
use crate::schema::{self, BootstrapReport, SchemaSource};
use crate::storage::{ExecResult, Row, Rows, Storage, Value};

/// Path value that selects a private in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/vault/vault.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// How long to wait for a free connection.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection. `None` keeps them open.
    /// Default: 10 minutes
    pub idle_timeout: Option<Duration>,

    /// Schema script run on connect.
    /// Default: the embedded `sql/init.sql`
    pub schema: SchemaSource,
}

impl DbConfig {
    /// Creates a configuration for the database file at `path`.
    ///
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            schema: SchemaSource::Embedded,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the schema source.
    pub fn schema(mut self, schema: SchemaSource) -> Self {
        self.schema = schema;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// // Fresh, isolated database with the items table
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(MEMORY_PATH),
            // Every connection would get its own empty database
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            schema: SchemaSource::Embedded,
        }
    }

    /// Returns true if this configuration targets an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == MEMORY_PATH
    }

    fn connect_options(&self) -> StorageResult<SqliteConnectOptions> {
        if self.is_in_memory() {
            return SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| StorageError::ConnectionFailed(e.to_string()));
        }

        Ok(SqliteConnectOptions::new()
            .filename(&self.database_path)
            .journal_mode(SqliteJournalMode::Wal)
            // Good balance of durability and speed under WAL
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true))
    }
}

// =============================================================================
// Database
// =============================================================================

/// SQLite-backed [`Storage`].
///
/// Cloning is cheap: clones share the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Creates the pool and bootstraps the schema.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Enables WAL + NORMAL synchronous for file databases
    /// 3. Creates the connection pool
    /// 4. Runs the configured schema script
    ///
    /// ## Errors
    /// - `ConnectionFailed` if the pool can't be opened
    /// - `Schema` if a configured script file can't be read
    pub async fn new(config: DbConfig) -> StorageResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_options = config.connect_options()?;
        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(if config.is_in_memory() {
                None
            } else {
                Some(Duration::from_secs(30 * 60))
            })
            .connect_with(connect_options)
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };
        db.bootstrap(&config.schema).await?;
        Ok(db)
    }

    /// Runs the schema script from `source` under a background context.
    pub async fn bootstrap(&self, source: &SchemaSource) -> StorageResult<BootstrapReport> {
        match source.load()? {
            Some(script) => {
                schema::bootstrap(self, &RequestContext::background(), &script).await
            }
            None => {
                debug!("Schema bootstrap disabled");
                Ok(BootstrapReport::default())
            }
        }
    }

    /// Returns the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the item repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let items = db.items().find_all(&ctx).await?;
    /// ```
    pub fn items(&self) -> ItemRepository<Database> {
        ItemRepository::new(self.clone())
    }

    /// Closes the pool. Later calls fail with `ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database answers a trivial query.
    pub async fn health_check(&self, ctx: &RequestContext) -> bool {
        self.query_row(ctx, "SELECT 1", &[]).await.is_ok()
    }
}

// =============================================================================
// Value Binding / Decoding
// =============================================================================

fn bind_params<'q>(sql: &'q str, params: &[Value]) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    params
        .iter()
        .fold(sqlx::query(sql), |query, param| match param {
            Value::Null => query.bind(None::<i64>),
            Value::Integer(v) => query.bind(*v),
            Value::Real(v) => query.bind(*v),
            Value::Text(v) => query.bind(v.clone()),
        })
}

fn decode_row(row: &SqliteRow) -> StorageResult<Row> {
    let mut columns = Vec::with_capacity(row.len());
    for index in 0..row.len() {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            columns.push(Value::Null);
            continue;
        }
        let type_name = raw.type_info().name().to_string();
        let value = match type_name.as_str() {
            "INTEGER" => Value::Integer(row.try_get(index)?),
            "REAL" => Value::Real(row.try_get(index)?),
            "TEXT" => Value::Text(row.try_get(index)?),
            other => {
                return Err(StorageError::decode(
                    index,
                    format!("unsupported column type {other}"),
                ))
            }
        };
        columns.push(value);
    }
    Ok(Row::new(columns))
}

// =============================================================================
// Storage Implementation
// =============================================================================

#[async_trait]
impl Storage for Database {
    async fn execute(
        &self,
        ctx: &RequestContext,
        sql: &str,
        params: &[Value],
    ) -> StorageResult<ExecResult> {
        ctx.run(async {
            let result = bind_params(sql, params).execute(&self.pool).await?;
            Ok::<_, StorageError>(ExecResult {
                rows_affected: result.rows_affected(),
                last_insert_id: result.last_insert_rowid(),
            })
        })
        .await
    }

    async fn query(
        &self,
        ctx: &RequestContext,
        sql: &str,
        params: &[Value],
    ) -> StorageResult<Rows> {
        ctx.run(async {
            let rows = bind_params(sql, params).fetch_all(&self.pool).await?;
            let rows = rows.iter().map(decode_row).collect::<StorageResult<Vec<_>>>()?;
            Ok::<_, StorageError>(Rows::new(rows))
        })
        .await
    }

    async fn query_row(
        &self,
        ctx: &RequestContext,
        sql: &str,
        params: &[Value],
    ) -> StorageResult<Row> {
        ctx.run(async {
            match bind_params(sql, params).fetch_optional(&self.pool).await? {
                Some(row) => decode_row(&row),
                None => Err(StorageError::NoRows),
            }
        })
        .await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
