//! inventory-core: Domain types for the inventory tracker
//!
//! This crate provides:
//! - Item and user records as exposed over the API
//! - Input normalization for item upserts (name trimming, quantity defaulting)
//! - List filter parsing (numeric id queries, quantity bounds)
//! - Registration and login input validation
//!
//! Nothing in here performs I/O; the store and server crates build on it.

pub mod error;
pub mod item;
pub mod types;
pub mod user;

pub use error::{CoreError, CoreResult};
pub use item::{DEFAULT_QUANTITY, ItemDraft, ItemFilter, ItemName, NameQuery, coerce_quantity};
pub use types::{Item, ItemId, User, UserId};
pub use user::{Credentials, Registration};
