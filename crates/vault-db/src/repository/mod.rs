//! # Repository Module
//!
//! Repositories translate entity operations into parameterized SQL.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  ItemUsecase                                                           │
//! │       │                                                                 │
//! │       │  repo.find_by_id(&ctx, 7)                                      │
//! │       ▼                                                                 │
//! │  ItemRepository<S: Storage>                                            │
//! │  ├── find_all / find_by_id / count                                     │
//! │  ├── insert  → last insert id                                          │
//! │  ├── update  → rows affected                                           │
//! │  └── delete  → rows affected                                           │
//! │       │                                                                 │
//! │       │  SQL + positional Values                                        │
//! │       ▼                                                                 │
//! │  Storage (SQLite Database, or a test wrapper)                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories own SQL shape only. They validate nothing and pass
//! `StorageError`s through untouched.
//!
//! ## Available Repositories
//!
//! - [`ItemRepository`](item::ItemRepository) - Item CRUD

pub mod item;
