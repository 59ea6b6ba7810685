//! # vault-core: Pure Business Types for Vault
//!
//! This crate holds the domain model of the item record service. Nothing in
//! here touches a database, a socket or the file system.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Vault Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/api (axum HTTP transport)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            vault-usecase (merge, validate, classify)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vault-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   item    │  │   patch   │  │  summary  │  │ validation│  │   │
//! │  │   │   Item    │  │ Patch<T>  │  │ Category  │  │   rules   │  │   │
//! │  │   │  NewItem  │  │ Set/Unset │  │  Summary  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          vault-db (Storage trait, SQLite, repository)           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`item`] - The `Item` entity and its validated constructor
//! - [`input`] - Create and partial-update request inputs
//! - [`patch`] - `Patch<T>`, the explicit set/unset field wrapper
//! - [`summary`] - Per-category count and value aggregation
//! - [`validation`] - Field rules shared by create and update
//! - [`error`] - Validation errors and the closed `ItemError` taxonomy
//!
//! ## Example Usage
//!
//! ```rust
//! use vault_core::Item;
//!
//! let item = Item::new("Watch", "Watch", "ROLEX", 1_000_000, "2023-01-01").unwrap();
//! assert_eq!(item.brand, "ROLEX");
//!
//! assert!(Item::new("Watch", "Watch", "ROLEX", -1, "2023-01-01").is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod input;
pub mod item;
pub mod patch;
pub mod summary;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{ItemError, ItemResult, ValidationError};
pub use input::{CreateItemInput, UpdateItemInput};
pub use item::{timestamp_now, Item, NewItem};
pub use patch::Patch;
pub use summary::{CategoryStats, CategorySummary};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Wire and storage format of `purchase_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
