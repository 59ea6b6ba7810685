//! Storage error classification.
//!
//! ```text
//! StorageError::NoRows            ──► ItemError::NotFound(id)
//! StorageError::Cancelled         ──┐
//! StorageError::DeadlineExceeded  ──┴► ItemError::Cancelled
//! anything else                   ──► error! log, ItemError::Database
//! ```

use tracing::error;

use vault_core::ItemError;
use vault_db::StorageError;

/// Maps a storage failure onto the item error taxonomy.
///
/// `id` is the item the failing call was about. A `NoRows` outside of a
/// by-id lookup is unexpected and classified as `Database`.
pub fn classify(err: StorageError, id: Option<i64>) -> ItemError {
    match (err, id) {
        (StorageError::NoRows, Some(id)) => ItemError::NotFound(id),
        (StorageError::Cancelled | StorageError::DeadlineExceeded, _) => ItemError::Cancelled,
        (err, id) => {
            error!(error = %err, item_id = ?id, "Storage operation failed");
            ItemError::Database
        }
    }
}
