//! Database models for the storage layer.
//!
//! These types map directly to database rows. Conversions into the
//! inventory-core records drop storage-only columns.

use chrono::{DateTime, Utc};
use inventory_core::{Item, ItemId, User, UserId};
use sqlx::FromRow;

/// Database row for the `items` table.
#[derive(Debug, Clone, FromRow)]
pub struct ItemRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            id: ItemId(row.id),
            name: row.name,
            description: row.description,
            quantity: row.quantity,
            created_at: row.created_at,
        }
    }
}

/// Result of an upsert.
#[derive(Debug, Clone)]
pub struct UpsertOutcome {
    pub item: Item,
    /// `true` when a new row was inserted, `false` when an existing one grew.
    pub created: bool,
}

// ==================== User Management Models ====================

/// Database row for the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId(row.id),
            username: row.username,
            email: row.email,
        }
    }
}

/// Input for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: String,
}
