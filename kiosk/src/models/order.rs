// kiosk/src/models/order.rs

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// One row of `orders`. `payment_details` holds the masked payment as JSON.
#[derive(Debug, Clone, FromRow)]
pub struct OrderRecord {
  pub id: i64,
  pub created_at: DateTime<Utc>,
  pub total_cents: i64,
  pub payment_key: String,
  pub payment_details: String,
}
