// tests/common/mod.rs
#![allow(dead_code)]

use kiosk_core::TotalPolicy;
use kiosk_server::config::AppConfig;
use kiosk_server::state::AppState;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub fn test_config(policy: TotalPolicy) -> AppConfig {
  let policy = policy.to_string();
  AppConfig::from_lookup(|name| match name {
    "DATABASE_URL" => Some("sqlite::memory:".to_string()),
    "ORDER_TOTAL_POLICY" => Some(policy.clone()),
    _ => None,
  })
  .expect("test config")
}

/// Fresh in-memory database with an empty catalog.
pub async fn empty_state(policy: TotalPolicy) -> AppState {
  setup_tracing();
  kiosk_server::build_app_state(Arc::new(test_config(policy)))
    .await
    .expect("app state")
}

/// Mains(1): Burger(5) 9.50, Fries(6) 3.00. Drinks(2): Cola(7) 1.99.
pub async fn seeded_state(policy: TotalPolicy) -> AppState {
  let state = empty_state(policy).await;
  insert_fixture_catalog(&state).await;
  state
}

/// SQLite file under the temp dir, deleted with its journal files on drop.
pub struct TempDbFile {
  pub path: PathBuf,
}

impl TempDbFile {
  pub fn new() -> Self {
    let path = std::env::temp_dir().join(format!("kiosk-test-{}.db", uuid::Uuid::new_v4()));
    Self { path }
  }

  pub fn url(&self) -> String {
    format!("sqlite://{}?mode=rwc", self.path.display())
  }
}

impl Drop for TempDbFile {
  fn drop(&mut self) {
    for suffix in ["", "-wal", "-shm", "-journal"] {
      std::fs::remove_file(format!("{}{}", self.path.display(), suffix)).ok();
    }
  }
}

/// Seeded catalog in a file-backed database whose pool really holds
/// `connections` connections.
pub async fn file_backed_seeded_state(policy: TotalPolicy, db: &TempDbFile, connections: u32) -> AppState {
  setup_tracing();
  let (url, policy, connections) = (db.url(), policy.to_string(), connections.to_string());
  let config = AppConfig::from_lookup(|name| match name {
    "DATABASE_URL" => Some(url.clone()),
    "ORDER_TOTAL_POLICY" => Some(policy.clone()),
    "DB_MAX_CONNECTIONS" => Some(connections.clone()),
    _ => None,
  })
  .expect("file db config");
  let state = kiosk_server::build_app_state(Arc::new(config)).await.expect("app state");
  insert_fixture_catalog(&state).await;
  state
}

async fn insert_fixture_catalog(state: &AppState) {
  for statement in [
    "INSERT INTO categories (id, name, image) VALUES (1, 'Mains', 'mains.jpg'), (2, 'Drinks', NULL)",
    "INSERT INTO items (id, category_id, name, price_cents, description, image_id) VALUES
       (5, 1, 'Burger', 950, 'Beef patty', 'burger'),
       (6, 1, 'Fries', 300, NULL, NULL),
       (7, 2, 'Cola', 199, NULL, NULL)",
  ] {
    sqlx::query(statement).execute(&state.db_pool).await.expect("fixture insert");
  }
}

pub fn payment_json() -> Value {
  json!({
    "card_number": "4111 1111 1111 1111",
    "card_holder_name": "Ada Lovelace",
    "expiry_month": 12,
    "expiry_year": 2099,
    "cvv": "123",
    "billing_address": {"street": "1 Main St", "city": "Springfield", "state": "IL", "zip": "62701"}
  })
}

pub fn order_json(lines: &[(i64, i64)], total: f64) -> Value {
  let items: Vec<Value> = lines
    .iter()
    .map(|(item_id, quantity)| json!({"item_id": item_id, "quantity": quantity}))
    .collect();
  json!({ "items": items, "total": total, "payment": payment_json() })
}

pub async fn row_counts(state: &AppState) -> (i64, i64) {
  let (orders,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
    .fetch_one(&state.db_pool)
    .await
    .unwrap();
  let (lines,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM order_items")
    .fetch_one(&state.db_pool)
    .await
    .unwrap();
  (orders, lines)
}
