//! # Request Inputs
//!
//! What a client sends to create or partially update an item. These are
//! raw, unvalidated values; the usecase decides whether they are acceptable.

use serde::{Deserialize, Serialize};

use crate::patch::Patch;

/// Fields required to create an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateItemInput {
    pub name: String,
    pub category: String,
    pub brand: String,
    pub purchase_price: i64,
    /// `YYYY-MM-DD`
    pub purchase_date: String,
}

/// A partial update. Every field is independently set or unset.
///
/// ## Example
/// ```rust
/// use vault_core::{Patch, UpdateItemInput};
///
/// let input: UpdateItemInput = serde_json::from_str(r#"{"brand": "Omega"}"#).unwrap();
/// assert_eq!(input.brand, Patch::Set("Omega".to_string()));
/// assert!(input.name.is_unset());
/// assert!(!input.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItemInput {
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub name: Patch<String>,

    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub category: Patch<String>,

    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub brand: Patch<String>,

    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub purchase_price: Patch<i64>,

    /// `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Patch::is_unset")]
    pub purchase_date: Patch<String>,
}

impl UpdateItemInput {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_unset()
            && self.category.is_unset()
            && self.brand.is_unset()
            && self.purchase_price.is_unset()
            && self.purchase_date.is_unset()
    }

    /// Sets the name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Patch::Set(name.into());
        self
    }

    /// Sets the category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Patch::Set(category.into());
        self
    }

    /// Sets the brand.
    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Patch::Set(brand.into());
        self
    }

    /// Sets the purchase price.
    pub fn purchase_price(mut self, price: i64) -> Self {
        self.purchase_price = Patch::Set(price);
        self
    }

    /// Sets the purchase date (`YYYY-MM-DD`).
    pub fn purchase_date(mut self, date: impl Into<String>) -> Self {
        self.purchase_date = Patch::Set(date.into());
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
