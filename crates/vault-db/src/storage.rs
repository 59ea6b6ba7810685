//! # Storage Capability Interface
//!
//! The minimal contract the repository needs from a database.
//!
//! ## Capability Set
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       trait Storage                                     │
//! │                                                                         │
//! │  execute(ctx, sql, params)   → ExecResult { rows_affected,             │
//! │                                             last_insert_id }           │
//! │  query(ctx, sql, params)     → Rows   (cursor: next / scan / drop)     │
//! │  query_row(ctx, sql, params) → Row    (StorageError::NoRows if none)   │
//! │                                                                         │
//! │  Implemented by:                                                       │
//! │  • Database (pool.rs)     - SQLite through sqlx                        │
//! │  • test wrappers          - record statements, inject failures         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Parameters are positional (`?1`, `?2`, ...) and carried as [`Value`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::error::{StorageError, StorageResult};

// =============================================================================
// Values
// =============================================================================

/// A single SQL value, used both for parameters and for result columns.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Reads a Rust value out of a column.
pub trait FromValue: Sized {
    /// Converts the column value, or explains why it can't.
    fn from_value(value: &Value) -> Result<Self, String>;
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Integer(v) => Ok(*v),
            other => Err(format!("expected integer, found {other:?}")),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Real(v) => Ok(*v),
            Value::Integer(v) => Ok(*v as f64),
            other => Err(format!("expected real, found {other:?}")),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Text(v) => Ok(v.clone()),
            other => Err(format!("expected text, found {other:?}")),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

// =============================================================================
// Rows
// =============================================================================

/// Outcome of a statement that returns no rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    pub last_insert_id: i64,
}

/// One result row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<Value>,
}

impl Row {
    /// Creates a row from its column values.
    pub fn new(columns: Vec<Value>) -> Self {
        Row { columns }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Reads column `index` as `T`.
    ///
    /// ## Errors
    /// `StorageError::Decode` if the column is missing or has another type.
    pub fn get<T: FromValue>(&self, index: usize) -> StorageResult<T> {
        let value = self
            .columns
            .get(index)
            .ok_or_else(|| StorageError::decode(index, "column out of range"))?;
        T::from_value(value).map_err(|reason| StorageError::decode(index, reason))
    }

    /// Scans the whole row into `T`.
    pub fn scan<T: FromRow>(&self) -> StorageResult<T> {
        T::from_row(self)
    }
}

/// Builds a value from a full row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> StorageResult<Self>;
}

/// Cursor over the rows of a query. Closed when dropped.
#[derive(Debug, Default)]
pub struct Rows {
    rows: std::vec::IntoIter<Row>,
}

impl Rows {
    /// Wraps fetched rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Rows {
            rows: rows.into_iter(),
        }
    }

    /// Scans every remaining row, stopping at the first decode error.
    pub fn scan_all<T: FromRow>(self) -> StorageResult<Vec<T>> {
        self.map(|row| row.scan()).collect()
    }
}

impl Iterator for Rows {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.rows.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

// =============================================================================
// Storage Trait
// =============================================================================

/// Abstract database capability consumed by repositories.
///
/// Every call takes a [`RequestContext`] and must give up promptly with
/// `Cancelled`/`DeadlineExceeded` once the context says so.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Executes a statement that returns no rows.
    async fn execute(
        &self,
        ctx: &RequestContext,
        sql: &str,
        params: &[Value],
    ) -> StorageResult<ExecResult>;

    /// Runs a query and returns a cursor over its rows.
    async fn query(&self, ctx: &RequestContext, sql: &str, params: &[Value])
        -> StorageResult<Rows>;

    /// Runs a query expected to return one row.
    ///
    /// ## Errors
    /// `StorageError::NoRows` if the query matched nothing.
    async fn query_row(
        &self,
        ctx: &RequestContext,
        sql: &str,
        params: &[Value],
    ) -> StorageResult<Row>;
}

#[async_trait]
impl<S: Storage + ?Sized> Storage for Arc<S> {
    async fn execute(
        &self,
        ctx: &RequestContext,
        sql: &str,
        params: &[Value],
    ) -> StorageResult<ExecResult> {
        (**self).execute(ctx, sql, params).await
    }

    async fn query(
        &self,
        ctx: &RequestContext,
        sql: &str,
        params: &[Value],
    ) -> StorageResult<Rows> {
        (**self).query(ctx, sql, params).await
    }

    async fn query_row(
        &self,
        ctx: &RequestContext,
        sql: &str,
        params: &[Value],
    ) -> StorageResult<Row> {
        (**self).query_row(ctx, sql, params).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
