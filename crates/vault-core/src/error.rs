//! # Error Types
//!
//! Domain-specific error types for vault-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vault-core errors (this file)                                         │
//! │  ├── ValidationError  - A field or request broke an item rule          │
//! │  └── ItemError        - Closed taxonomy returned by the usecase        │
//! │                                                                         │
//! │  vault-db errors (separate crate)                                      │
//! │  └── StorageError     - Unclassified storage failures                  │
//! │                                                                         │
//! │  API errors (in app)                                                   │
//! │  └── ApiError         - Status code + JSON body                        │
//! │                                                                         │
//! │  Flow: StorageError ─classify─► ItemError ──► ApiError ──► Client      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Transport Mapping
//! | Variant      | HTTP |
//! |--------------|------|
//! | `Validation` | 400  |
//! | `NotFound`   | 404  |
//! | `Database`   | 500  |
//! | `Cancelled`  | 503  |

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any storage call on create, and after the existence check
/// on update.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing, empty or whitespace-only.
    #[error("{field} is required")]
    Required { field: String },

    /// A numeric field is below zero.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., unparseable date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A partial update supplied no fields at all.
    #[error("at least one field must be provided")]
    EmptyUpdate,
}

impl ValidationError {
    /// Creates a Required error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates an InvalidFormat error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Item Error
// =============================================================================

/// The closed set of failures an item operation can end in.
///
/// Storage details never travel inside this type. The usecase logs them and
/// collapses them into [`ItemError::Database`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemError {
    /// Request rejected by an item rule.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No stored item has this id.
    #[error("Item not found: {0}")]
    NotFound(i64),

    /// Storage failed for a reason the caller cannot act on.
    #[error("Database operation failed")]
    Database,

    /// The caller cancelled the operation or its deadline passed.
    #[error("Operation cancelled before completion")]
    Cancelled,
}

/// Convenience type alias for Results with ItemError.
pub type ItemResult<T> = Result<T, ItemError>;

// =============================================================================
// Unit Tests
// =============================================================================
