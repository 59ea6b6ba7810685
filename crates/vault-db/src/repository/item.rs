//! # Item Repository
//!
//! SQL for the `items` table.
//!
//! ## Column Encoding
//! ```text
//! ┌──────────────────┬──────────┬──────────────────────────────────┐
//! │ Field            │ Column   │ Encoding                         │
//! ├──────────────────┼──────────┼──────────────────────────────────┤
//! │ id               │ INTEGER  │ AUTOINCREMENT, never reused      │
//! │ purchase_price   │ INTEGER  │ as is                            │
//! │ purchase_date    │ TEXT     │ YYYY-MM-DD                       │
//! │ created_at       │ TEXT     │ RFC 3339, UTC, microseconds      │
//! │ updated_at       │ TEXT     │ RFC 3339, UTC, microseconds      │
//! └──────────────────┴──────────┴──────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use tracing::debug;

use vault_core::{Item, NewItem, DATE_FORMAT};

use crate::context::RequestContext;
use crate::error::{StorageError, StorageResult};
use crate::storage::{FromRow, Row, Storage, Value};

const SELECT_COLUMNS: &str = "SELECT id, name, category, brand, purchase_price, purchase_date, \
                              created_at, updated_at FROM items";

/// Repository for item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ItemRepository::new(db.clone());
///
/// let id = repo.insert(&ctx, &new_item).await?;
/// let item = repo.find_by_id(&ctx, id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository<S> {
    storage: S,
}

impl<S: Storage> ItemRepository<S> {
    /// Creates a repository over `storage`.
    pub fn new(storage: S) -> Self {
        ItemRepository { storage }
    }

    /// Returns the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Lists every item, ordered by id.
    pub async fn find_all(&self, ctx: &RequestContext) -> StorageResult<Vec<Item>> {
        debug!("Listing items");

        let sql = format!("{SELECT_COLUMNS} ORDER BY id");
        let items: Vec<Item> = self.storage.query(ctx, &sql, &[]).await?.scan_all()?;

        debug!(count = items.len(), "Listed items");
        Ok(items)
    }

    /// Gets an item by id.
    ///
    /// ## Errors
    /// `StorageError::NoRows` if no item has this id.
    pub async fn find_by_id(&self, ctx: &RequestContext, id: i64) -> StorageResult<Item> {
        debug!(id = id, "Getting item");

        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        self.storage
            .query_row(ctx, &sql, &[Value::Integer(id)])
            .await?
            .scan()
    }

    /// Inserts a new item and returns the id storage assigned.
    pub async fn insert(&self, ctx: &RequestContext, item: &NewItem) -> StorageResult<i64> {
        debug!(name = %item.name, category = %item.category, "Inserting item");

        let created_at = encode_timestamp(&item.created_at);
        let result = self
            .storage
            .execute(
                ctx,
                r#"
                INSERT INTO items (
                    name, category, brand, purchase_price, purchase_date,
                    created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                &[
                    Value::from(item.name.as_str()),
                    Value::from(item.category.as_str()),
                    Value::from(item.brand.as_str()),
                    Value::Integer(item.purchase_price),
                    Value::Text(encode_date(&item.purchase_date)),
                    Value::Text(created_at.clone()),
                    Value::Text(created_at),
                ],
            )
            .await?;

        debug!(id = result.last_insert_id, "Item inserted");
        Ok(result.last_insert_id)
    }

    /// Replaces every mutable column of `item.id` and returns rows affected.
    ///
    /// `created_at` is never rewritten.
    pub async fn update(&self, ctx: &RequestContext, item: &Item) -> StorageResult<u64> {
        debug!(id = item.id, "Updating item");

        let result = self
            .storage
            .execute(
                ctx,
                r#"
                UPDATE items SET
                    name = ?1,
                    category = ?2,
                    brand = ?3,
                    purchase_price = ?4,
                    purchase_date = ?5,
                    updated_at = ?6
                WHERE id = ?7
                "#,
                &[
                    Value::from(item.name.as_str()),
                    Value::from(item.category.as_str()),
                    Value::from(item.brand.as_str()),
                    Value::Integer(item.purchase_price),
                    Value::Text(encode_date(&item.purchase_date)),
                    Value::Text(encode_timestamp(&item.updated_at)),
                    Value::Integer(item.id),
                ],
            )
            .await?;

        Ok(result.rows_affected)
    }

    /// Deletes an item and returns rows affected.
    pub async fn delete(&self, ctx: &RequestContext, id: i64) -> StorageResult<u64> {
        debug!(id = id, "Deleting item");

        let result = self
            .storage
            .execute(ctx, "DELETE FROM items WHERE id = ?1", &[Value::Integer(id)])
            .await?;

        Ok(result.rows_affected)
    }

    /// Counts stored items.
    pub async fn count(&self, ctx: &RequestContext) -> StorageResult<i64> {
        self.storage
            .query_row(ctx, "SELECT COUNT(*) FROM items", &[])
            .await?
            .get(0)
    }
}

// =============================================================================
// Row Mapping
// =============================================================================

fn encode_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn encode_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_date(row: &Row, index: usize) -> StorageResult<NaiveDate> {
    let raw: String = row.get(index)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|e| StorageError::decode(index, format!("bad date {raw:?}: {e}")))
}

fn decode_timestamp(row: &Row, index: usize) -> StorageResult<DateTime<Utc>> {
    let raw: String = row.get(index)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| StorageError::decode(index, format!("bad timestamp {raw:?}: {e}")))
}

impl FromRow for Item {
    fn from_row(row: &Row) -> StorageResult<Self> {
        Ok(Item {
            id: row.get(0)?,
            name: row.get(1)?,
            category: row.get(2)?,
            brand: row.get(3)?,
            purchase_price: row.get(4)?,
            purchase_date: decode_date(row, 5)?,
            created_at: decode_timestamp(row, 6)?,
            updated_at: decode_timestamp(row, 7)?,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
