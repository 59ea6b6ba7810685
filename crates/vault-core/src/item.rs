//! # Item Entity
//!
//! The record managed by Vault.
//!
//! ## Lifecycle
//! ```text
//! absent ──create──► present ──update (field merge)──► present ──delete──► absent
//! ```
//!
//! `Item::new` is the only way to build a record that has not been stored
//! yet, and it refuses invalid input. Stored items carry the id assigned by
//! storage.

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::validation::{
    parse_purchase_date, validate_brand, validate_category, validate_name,
    validate_purchase_price, ValidationResult,
};

/// Current UTC time truncated to microseconds.
///
/// Storage keeps microsecond precision, so values produced here compare
/// equal after a round trip.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

// =============================================================================
// Item
// =============================================================================

/// A stored item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Item {
    /// Identity assigned by storage on creation.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Free-form category label, e.g. "Watch" or "Bag".
    pub category: String,

    /// Maker of the item.
    pub brand: String,

    /// Price paid, in the smallest currency unit.
    pub purchase_price: i64,

    /// Day of purchase, serialized as `YYYY-MM-DD`.
    #[ts(as = "String")]
    pub purchase_date: NaiveDate,

    /// When the item was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the item was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Validates the fields of a new item.
    ///
    /// ## Errors
    /// - `Required` if name, category or brand is empty
    /// - `Negative` if `purchase_price < 0`
    /// - `InvalidFormat` / `Required` if the date does not parse
    ///
    /// ## Example
    /// ```rust
    /// use vault_core::Item;
    ///
    /// let new_item = Item::new("Speedmaster", "Watch", "Omega", 0, "2022-12-24").unwrap();
    /// let stored = new_item.into_item(1);
    /// assert_eq!(stored.id, 1);
    /// assert_eq!(stored.created_at, stored.updated_at);
    /// ```
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        brand: impl Into<String>,
        purchase_price: i64,
        purchase_date: &str,
    ) -> ValidationResult<NewItem> {
        let name = name.into();
        let category = category.into();
        let brand = brand.into();

        validate_name(&name)?;
        validate_category(&category)?;
        validate_brand(&brand)?;
        validate_purchase_price(purchase_price)?;
        let purchase_date = parse_purchase_date(purchase_date)?;

        Ok(NewItem {
            name,
            category,
            brand,
            purchase_price,
            purchase_date,
            created_at: timestamp_now(),
        })
    }
}

// =============================================================================
// New Item
// =============================================================================

/// A validated item that has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub brand: String,
    pub purchase_price: i64,
    pub purchase_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl NewItem {
    /// Attaches the id assigned by storage.
    pub fn into_item(self, id: i64) -> Item {
        Item {
            id,
            name: self.name,
            category: self.category,
            brand: self.brand,
            purchase_price: self.purchase_price,
            purchase_date: self.purchase_date,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
