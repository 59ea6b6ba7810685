//! # Category Summary
//!
//! Groups items by category and totals their purchase price.
//!
//! ```text
//! items                                   summary
//! ─────────────────────────────           ──────────────────────────────
//! Watch  ROLEX   1,000,000   ──┐          Watch → count 2, total 1,800,000
//! Watch  Omega     800,000   ──┤  ──►     Bag   → count 1, total   300,000
//! Bag    Chanel    300,000   ──┘          total_count 3, total_price 2,100,000
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::item::Item;

/// Aggregate figures for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryStats {
    /// Number of items in the category.
    pub count: u64,
    /// Sum of `purchase_price` over those items.
    pub total_price: i64,
}

impl CategoryStats {
    fn add(&mut self, price: i64) {
        self.count += 1;
        self.total_price = self.total_price.saturating_add(price);
    }
}

/// Per-category totals over a set of items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategorySummary {
    /// Category label → stats. Ordered by label for stable output.
    pub categories: BTreeMap<String, CategoryStats>,
    /// Number of items across all categories.
    pub total_count: u64,
    /// Purchase price summed across all categories.
    pub total_price: i64,
}

impl CategorySummary {
    /// Aggregates a snapshot of items.
    ///
    /// ## Example
    /// ```rust
    /// use vault_core::{CategorySummary, Item};
    ///
    /// let a = Item::new("A", "Watch", "ROLEX", 100, "2023-01-01").unwrap().into_item(1);
    /// let b = Item::new("B", "Watch", "Omega", 50, "2023-01-02").unwrap().into_item(2);
    ///
    /// let summary = CategorySummary::from_items(&[a, b]);
    /// assert_eq!(summary.get("Watch").unwrap().total_price, 150);
    /// ```
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
        let mut summary = CategorySummary::default();
        for item in items {
            summary
                .categories
                .entry(item.category.clone())
                .or_default()
                .add(item.purchase_price);
            summary.total_count += 1;
            summary.total_price = summary.total_price.saturating_add(item.purchase_price);
        }
        summary
    }

    /// Returns the stats of one category.
    pub fn get(&self, category: &str) -> Option<&CategoryStats> {
        self.categories.get(category)
    }

    /// Returns true if no item was aggregated.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
