//! # Storage Error Types
//!
//! Error types for storage operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StorageError (this module) ← Driver-neutral, still unclassified       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  classify() in vault-usecase ← NotFound / Database / Cancelled         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError ← Status code for the client                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Storage operation errors.
///
/// The repository returns these untouched; deciding what they mean for the
/// caller is the usecase's job.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A single-row query matched nothing.
    #[error("Query returned no rows")]
    NoRows,

    /// The request context was cancelled.
    #[error("Operation cancelled")]
    Cancelled,

    /// The request context's deadline passed.
    #[error("Deadline exceeded")]
    DeadlineExceeded,

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created or opened
    /// - Pool already closed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Statement rejected by the engine (syntax, constraint, missing table).
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A column could not be read as the requested type.
    #[error("Failed to decode column {column}: {reason}")]
    Decode { column: String, reason: String },

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// The schema script could not be loaded.
    #[error("Schema script unavailable: {0}")]
    Schema(String),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl StorageError {
    /// Creates a Decode error.
    pub fn decode(column: impl ToString, reason: impl Into<String>) -> Self {
        StorageError::Decode {
            column: column.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns true for the cancellation and deadline variants.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, StorageError::Cancelled | StorageError::DeadlineExceeded)
    }
}

/// Convert sqlx errors to StorageError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → StorageError::NoRows
/// sqlx::Error::Database       → StorageError::QueryFailed
/// sqlx::Error::ColumnDecode   → StorageError::Decode
/// sqlx::Error::PoolTimedOut   → StorageError::PoolExhausted
/// sqlx::Error::PoolClosed     → StorageError::ConnectionFailed
/// Other                       → StorageError::Internal
/// ```
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StorageError::NoRows,
            sqlx::Error::Database(db_err) => StorageError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::ColumnDecode { index, source } => StorageError::Decode {
                column: index,
                reason: source.to_string(),
            },
            sqlx::Error::PoolTimedOut => StorageError::PoolExhausted,
            sqlx::Error::PoolClosed => StorageError::ConnectionFailed("Pool is closed".to_string()),
            other => StorageError::Internal(other.to_string()),
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
