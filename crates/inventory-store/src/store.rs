//! Main store implementation for database operations.
//!
//! The `Store` type owns the SQLite pool and provides the item and user
//! operations. Every call runs fresh queries; nothing is cached.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use inventory_core::{CoreError, Item, ItemDraft, ItemFilter};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::error::{StoreError, StoreResult};
use crate::models::*;
use crate::schema;

const ITEM_COLUMNS: &str = "id, name, description, quantity, created_at";
const USER_COLUMNS: &str = "id, username, email, password_hash, created_at";

/// Configuration for opening the database.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// SQLite connection URL, e.g. `sqlite:database.db`.
    pub database_url: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// How long a connection waits for the write lock before failing.
    pub busy_timeout: Duration,
    /// Run migrations on connect.
    pub run_migrations: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:database.db".to_string(),
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }
}

impl StoreConfig {
    /// Create configuration from environment variables.
    ///
    /// Reads:
    /// - `DATABASE_URL` - Optional, defaults to `sqlite:database.db`
    /// - `DATABASE_MAX_CONNECTIONS` - Optional, defaults to 5
    /// - `DATABASE_RUN_MIGRATIONS` - Optional, defaults to true
    pub fn from_env() -> StoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`StoreConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> StoreResult<Self> {
        let defaults = Self::default();

        let database_url = lookup("DATABASE_URL").unwrap_or(defaults.database_url);
        if !database_url.starts_with("sqlite:") {
            return Err(StoreError::ConfigError(format!(
                "DATABASE_URL must be a sqlite: URL, got {}",
                database_url
            )));
        }

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                StoreError::ConfigError(format!("invalid DATABASE_MAX_CONNECTIONS: {}", raw))
            })?,
            None => defaults.max_connections,
        };

        let run_migrations = lookup("DATABASE_RUN_MIGRATIONS")
            .map(|s| s.to_lowercase() != "false" && s != "0")
            .unwrap_or(defaults.run_migrations);

        Ok(Self {
            database_url,
            max_connections,
            busy_timeout: defaults.busy_timeout,
            run_migrations,
        })
    }

    /// Configuration for a database file at `path`.
    pub fn sqlite_file(path: impl AsRef<Path>) -> Self {
        Self {
            database_url: format!("sqlite:{}", path.as_ref().display()),
            ..Self::default()
        }
    }
}

/// Database store for the inventory tracker.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (creating if needed) the database described by `config`.
    ///
    /// Runs migrations if `config.run_migrations` is true.
    pub async fn connect(config: StoreConfig) -> StoreResult<Self> {
        tracing::info!(url = %config.database_url, "Opening database...");

        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        tracing::info!("Opened database");

        if config.run_migrations {
            schema::run_migrations(&pool).await?;
        }

        Ok(Self { pool })
    }

    /// Create a store from an existing connection pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Round-trip a trivial query to prove the database is reachable.
    pub async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // ==================== Item Operations ====================

    /// Insert a new item or add to an existing one with the same
    /// case-insensitive name.
    ///
    /// An existing item keeps its id, name and creation time; its quantity
    /// grows by `draft.quantity` and its description is replaced only when
    /// the draft carries one.
    ///
    /// Both steps run in one transaction that opens with the write, so
    /// concurrent upserts of the same name are serialized by SQLite's write
    /// lock instead of racing on a stale read.
    pub async fn upsert_item(&self, draft: &ItemDraft) -> StoreResult<UpsertOutcome> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, ItemRow>(&format!(
            r#"
            UPDATE items
            SET quantity = quantity + ?1,
                description = COALESCE(?2, description)
            WHERE name_key = ?3 AND quantity <= ?4 - ?1
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(draft.quantity)
        .bind(draft.description.as_deref())
        .bind(draft.name.key())
        .bind(i64::MAX)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(row) = updated {
            tx.commit().await?;
            tracing::debug!(item_id = row.id, quantity = row.quantity, "Item quantity increased");
            return Ok(UpsertOutcome {
                item: row.into(),
                created: false,
            });
        }

        let inserted = sqlx::query_as::<_, ItemRow>(&format!(
            r#"
            INSERT INTO items (name, name_key, description, quantity, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (name_key) DO NOTHING
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(draft.name.as_str())
        .bind(draft.name.key())
        .bind(draft.description.as_deref().unwrap_or_default())
        .bind(draft.quantity)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?;

        match inserted {
            Some(row) => {
                tx.commit().await?;
                tracing::debug!(item_id = row.id, name = %row.name, "Item created");
                Ok(UpsertOutcome {
                    item: row.into(),
                    created: true,
                })
            }
            // The row exists but the guarded UPDATE skipped it.
            None => {
                let current: i64 =
                    sqlx::query_scalar("SELECT quantity FROM items WHERE name_key = ?1")
                        .bind(draft.name.key())
                        .fetch_one(&mut *tx)
                        .await?;
                tx.rollback().await?;
                Err(CoreError::QuantityOverflow {
                    current,
                    added: draft.quantity,
                }
                .into())
            }
        }
    }

    /// Get an item by ID.
    pub async fn get_item(&self, id: i64) -> StoreResult<Item> {
        sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Item::from)
        .ok_or(StoreError::ItemNotFound(id))
    }

    /// List items matching `filter`, newest first.
    pub async fn list_items(&self, filter: &ItemFilter) -> StoreResult<Vec<Item>> {
        let mut sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE 1 = 1");

        let mut param_idx = 1;

        if let Some(query) = &filter.query {
            if query.id.is_some() {
                sql.push_str(&format!(
                    " AND (instr(name_key, ?{}) > 0 OR id = ?{})",
                    param_idx,
                    param_idx + 1
                ));
                param_idx += 2;
            } else {
                sql.push_str(&format!(" AND instr(name_key, ?{}) > 0", param_idx));
                param_idx += 1;
            }
        }

        if filter.min.is_some() {
            sql.push_str(&format!(" AND quantity >= ?{}", param_idx));
            param_idx += 1;
        }

        if filter.max.is_some() {
            sql.push_str(&format!(" AND quantity <= ?{}", param_idx));
        }

        sql.push_str(" ORDER BY id DESC");

        let mut q = sqlx::query_as::<_, ItemRow>(&sql);

        if let Some(query) = &filter.query {
            q = q.bind(query.needle.as_str());
            if let Some(id) = query.id {
                q = q.bind(id.get());
            }
        }

        if let Some(min) = filter.min {
            q = q.bind(min);
        }

        if let Some(max) = filter.max {
            q = q.bind(max);
        }

        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    /// Total number of items.
    pub async fn count_items(&self) -> StoreResult<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?)
    }

    /// Number of items whose quantity is strictly below `threshold`.
    pub async fn count_items_below(&self, threshold: f64) -> StoreResult<i64> {
        Ok(
            sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE quantity < ?1")
                .bind(threshold)
                .fetch_one(&self.pool)
                .await?,
        )
    }

    // ==================== User Operations ====================

    /// Insert a new user.
    ///
    /// Fails with [`StoreError::DuplicateUser`] if the username or email is
    /// already registered.
    pub async fn insert_user(&self, user: &NewUser) -> StoreResult<UserRow> {
        if let Some(username) = &user.username {
            if self.get_user_by_username(username).await?.is_some() {
                return Err(StoreError::DuplicateUser { field: "username" });
            }
        }
        if let Some(email) = &user.email {
            if self.get_user_by_email(email).await?.is_some() {
                return Err(StoreError::DuplicateUser { field: "email" });
            }
        }

        let result = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.username.as_deref())
        .bind(user.email.as_deref())
        .bind(&user.password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await;

        // A concurrent registration can slip between the checks and the insert.
        result.map_err(StoreError::from).map_err(|e| {
            if e.is_unique_violation() {
                StoreError::DuplicateUser {
                    field: "username or email",
                }
            } else {
                e
            }
        })
    }

    /// Get a user by ID.
    pub async fn get_user_by_id(&self, id: i64) -> StoreResult<UserRow> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::UserNotFound(id))
    }

    /// Get a user by username.
    pub async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<UserRow>> {
        Ok(sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Get a user by email.
    pub async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<UserRow>> {
        Ok(sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Find the user whose username or email equals `identifier`.
    ///
    /// If one user's username equals another's email, the older account wins.
    pub async fn find_user_by_identifier(&self, identifier: &str) -> StoreResult<Option<UserRow>> {
        Ok(sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE username = ?1 OR email = ?1
            ORDER BY id
            LIMIT 1
            "#
        ))
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = StoreConfig::default();
        assert_eq!(config.database_url, "sqlite:database.db");
        assert_eq!(config.max_connections, 5);
        assert!(config.run_migrations);
    }

    #[test]
    fn test_config_from_lookup() {
        let config = StoreConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite:/tmp/stock.db"),
            ("DATABASE_MAX_CONNECTIONS", "2"),
            ("DATABASE_RUN_MIGRATIONS", "false"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "sqlite:/tmp/stock.db");
        assert_eq!(config.max_connections, 2);
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_config_rejects_non_sqlite_url() {
        let result = StoreConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x")]));
        assert!(matches!(result, Err(StoreError::ConfigError(_))));
    }

    #[test]
    fn test_config_rejects_bad_pool_size() {
        let result = StoreConfig::from_lookup(lookup(&[("DATABASE_MAX_CONNECTIONS", "lots")]));
        assert!(matches!(result, Err(StoreError::ConfigError(_))));
    }

    #[test]
    fn test_sqlite_file_url() {
        let config = StoreConfig::sqlite_file("/var/lib/stock.db");
        assert_eq!(config.database_url, "sqlite:/var/lib/stock.db");
    }
}
