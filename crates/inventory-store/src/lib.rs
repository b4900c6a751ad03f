//! inventory-store: Storage layer for the inventory tracker
//!
//! This crate provides:
//! - The item store: case-insensitive upsert, filtered listing, counts
//! - User persistence for the auth gate
//! - Embedded SQLite migrations
//!
//! # Usage
//!
//! ```rust,ignore
//! use inventory_core::{ItemDraft, ItemFilter};
//! use inventory_store::{Store, StoreConfig};
//!
//! let store = Store::connect(StoreConfig::from_env()?).await?;
//!
//! let draft = ItemDraft::new("Screws", Some(5), None)?;
//! let outcome = store.upsert_item(&draft).await?;
//!
//! let items = store.list_items(&ItemFilter::default().min(1)).await?;
//! ```

pub mod error;
pub mod models;
pub mod schema;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use models::*;
pub use store::{Store, StoreConfig};

// Re-export inventory-core for downstream crates
pub use inventory_core;
