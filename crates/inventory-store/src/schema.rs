//! Schema definitions and migration utilities.
//!
//! The SQL lives in the workspace `migrations/` directory and is embedded at
//! compile time. Every statement is guarded with `IF NOT EXISTS`, so running
//! the migrations on every start is safe.

use sqlx::SqlitePool;

use crate::error::{StoreError, StoreResult};

/// Embedded migration SQL for the items table (001_items.sql).
pub const ITEMS_MIGRATION: &str = include_str!("../../../migrations/001_items.sql");

/// Embedded migration SQL for the users table (002_users.sql).
pub const USERS_MIGRATION: &str = include_str!("../../../migrations/002_users.sql");

/// Run all migrations against the database.
///
/// # Errors
///
/// Returns an error if any migration fails to execute.
pub async fn run_migrations(pool: &SqlitePool) -> StoreResult<()> {
    tracing::info!("Running database migrations...");

    tracing::debug!("Running items migration (001_items.sql)...");
    sqlx::raw_sql(ITEMS_MIGRATION)
        .execute(pool)
        .await
        .map_err(|e| StoreError::MigrationError(format!("Items migration failed: {}", e)))?;

    tracing::debug!("Running users migration (002_users.sql)...");
    sqlx::raw_sql(USERS_MIGRATION)
        .execute(pool)
        .await
        .map_err(|e| StoreError::MigrationError(format!("Users migration failed: {}", e)))?;

    tracing::info!("Migrations completed successfully");
    Ok(())
}

/// Check if the schema has been initialized.
///
/// Returns true if both the `items` and `users` tables exist.
pub async fn is_schema_initialized(pool: &SqlitePool) -> StoreResult<bool> {
    let tables: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM sqlite_master
        WHERE type = 'table' AND name IN ('items', 'users')
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(tables == 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_migration_embedded() {
        assert!(ITEMS_MIGRATION.contains("CREATE TABLE IF NOT EXISTS items"));
        assert!(ITEMS_MIGRATION.contains("name_key"));
        assert!(ITEMS_MIGRATION.contains("AUTOINCREMENT"));
        assert!(ITEMS_MIGRATION.contains("CREATE UNIQUE INDEX IF NOT EXISTS items_name_key"));
    }

    #[test]
    fn test_users_migration_embedded() {
        assert!(USERS_MIGRATION.contains("CREATE TABLE IF NOT EXISTS users"));
        assert!(USERS_MIGRATION.contains("username IS NOT NULL OR email IS NOT NULL"));
    }
}
