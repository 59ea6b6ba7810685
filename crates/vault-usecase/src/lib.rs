//! # vault-usecase: Item Business Rules
//!
//! The layer between transport and storage. It decides the order of checks,
//! merges partial updates and turns storage failures into [`ItemError`]s.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  apps/api handler                                                      │
//! │       │  ItemUsecase::update_item(&ctx, id, input)                     │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────────┐                     │
//! │  │          vault-usecase (THIS CRATE)           │                     │
//! │  │                                               │                     │
//! │  │  ItemUsecase<S>  ──uses──►  vault-core rules  │                     │
//! │  │       │                                        │                     │
//! │  │       │ StorageError ──classify──► ItemError  │                     │
//! │  └───────┼───────────────────────────────────────┘                     │
//! │          ▼                                                              │
//! │  ItemRepository<S> (vault-db)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`ItemError`]: vault_core::ItemError

pub mod classify;
pub mod item;

pub use classify::classify;
pub use item::ItemUsecase;
