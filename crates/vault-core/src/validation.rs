//! # Validation Module
//!
//! Field rules for items. Creation runs every rule; a partial update runs
//! only the rules of the fields it supplies.
//!
//! ## Rules
//! ```text
//! ┌──────────────────┬────────────────────────────────────────────┐
//! │ Field            │ Rule                                       │
//! ├──────────────────┼────────────────────────────────────────────┤
//! │ name             │ not empty (whitespace-only counts as empty)│
//! │ brand            │ not empty                                  │
//! │ category         │ not empty, otherwise an opaque label       │
//! │ purchase_price   │ >= 0 (zero is allowed)                     │
//! │ purchase_date    │ a real calendar date in YYYY-MM-DD         │
//! └──────────────────┴────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::DATE_FORMAT;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn require_text(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

/// Validates an item name.
///
/// ## Example
/// ```rust
/// use vault_core::validation::validate_name;
///
/// assert!(validate_name("Submariner").is_ok());
/// assert!(validate_name("").is_err());
/// assert!(validate_name("   ").is_err());
/// ```
pub fn validate_name(name: &str) -> ValidationResult<()> {
    require_text("name", name)
}

/// Validates a brand.
pub fn validate_brand(brand: &str) -> ValidationResult<()> {
    require_text("brand", brand)
}

/// Validates a category label.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    require_text("category", category)
}

/// Validates a purchase price.
///
/// ## Example
/// ```rust
/// use vault_core::validation::validate_purchase_price;
///
/// assert!(validate_purchase_price(0).is_ok());
/// assert!(validate_purchase_price(-1).is_err());
/// ```
pub fn validate_purchase_price(price: i64) -> ValidationResult<()> {
    if price < 0 {
        return Err(ValidationError::Negative {
            field: "purchase_price".to_string(),
        });
    }
    Ok(())
}

/// Parses a purchase date in `YYYY-MM-DD` form.
///
/// Impossible dates such as `2023-02-30` are rejected.
pub fn parse_purchase_date(raw: &str) -> ValidationResult<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::required("purchase_date"));
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
        ValidationError::invalid_format("purchase_date", format!("expected YYYY-MM-DD ({e})"))
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
