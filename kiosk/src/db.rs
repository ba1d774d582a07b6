// kiosk/src/db.rs

//! Pool construction and idempotent schema bootstrap.

use crate::config::AppConfig;
use crate::errors::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

const SCHEMA: &[&str] = &[
  "CREATE TABLE IF NOT EXISTS categories (
     id    INTEGER PRIMARY KEY AUTOINCREMENT,
     name  TEXT NOT NULL UNIQUE COLLATE NOCASE,
     image TEXT
   )",
  "CREATE TABLE IF NOT EXISTS items (
     id          INTEGER PRIMARY KEY AUTOINCREMENT,
     category_id INTEGER NOT NULL REFERENCES categories(id),
     name        TEXT NOT NULL,
     price_cents INTEGER NOT NULL CHECK (price_cents > 0),
     description TEXT,
     image_id    TEXT,
     UNIQUE (category_id, name COLLATE NOCASE)
   )",
  "CREATE INDEX IF NOT EXISTS idx_items_category_id ON items(category_id)",
  "CREATE TABLE IF NOT EXISTS orders (
     id              INTEGER PRIMARY KEY AUTOINCREMENT,
     created_at      TEXT NOT NULL,
     total_cents     INTEGER NOT NULL CHECK (total_cents > 0),
     payment_key     TEXT NOT NULL UNIQUE,
     payment_details TEXT NOT NULL
   )",
  "CREATE TABLE IF NOT EXISTS order_items (
     id               INTEGER PRIMARY KEY AUTOINCREMENT,
     order_id         INTEGER NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
     item_id          INTEGER NOT NULL REFERENCES items(id),
     quantity         INTEGER NOT NULL CHECK (quantity > 0),
     unit_price_cents INTEGER NOT NULL CHECK (unit_price_cents > 0)
   )",
  "CREATE INDEX IF NOT EXISTS idx_order_items_order_id ON order_items(order_id)",
];

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

fn is_in_memory(database_url: &str) -> bool {
  database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Opens the pool with foreign keys enforced. An in-memory database lives in
/// a single connection, so its pool is pinned to one connection that never
/// expires. A file database runs in WAL mode, and concurrent writers wait out
/// the busy timeout.
#[instrument(name = "db::connect", skip(config), fields(max_connections = config.db_max_connections))]
pub async fn connect(config: &AppConfig) -> Result<SqlitePool> {
  let options = SqliteConnectOptions::from_str(&config.database_url)?
    .create_if_missing(true)
    .foreign_keys(true)
    .busy_timeout(BUSY_TIMEOUT);

  let (options, pool_options) = if is_in_memory(&config.database_url) {
    let pool_options = SqlitePoolOptions::new()
      .max_connections(1)
      .idle_timeout(None)
      .max_lifetime(None);
    (options, pool_options)
  } else {
    let pool_options = SqlitePoolOptions::new().max_connections(config.db_max_connections);
    (options.journal_mode(SqliteJournalMode::Wal), pool_options)
  };

  let pool = pool_options.connect_with(options).await?;
  info!("Database pool ready.");
  Ok(pool)
}

#[instrument(name = "db::bootstrap_schema", skip(pool))]
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<()> {
  for statement in SCHEMA {
    sqlx::query(statement).execute(pool).await?;
  }
  info!(statements = SCHEMA.len(), "Schema bootstrap complete.");
  Ok(())
}
