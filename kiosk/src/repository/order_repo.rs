// kiosk/src/repository/order_repo.rs

use crate::errors::{AppError, Result};
use crate::models::{OrderItemRecord, OrderRecord};
use chrono::Utc;
use kiosk_core::{Cents, LineItem, MaskedPayment, OrderDetail, OrderLine, OrderReceipt};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// Everything the checkout flow has settled before the order is written.
#[derive(Debug)]
pub struct NewOrder<'a> {
  pub lines: &'a [LineItem],
  pub unit_prices: &'a HashMap<i64, Cents>,
  pub total: Cents,
  pub payment_key: &'a str,
  pub masked_payment: &'a MaskedPayment,
}

/// Writes the order row and all of its line rows in one transaction. Any
/// failure rolls the whole order back.
#[instrument(
  name = "order_repo::insert_order",
  skip(pool, order),
  fields(lines = order.lines.len(), total = %order.total)
)]
pub async fn insert_order(pool: &SqlitePool, order: &NewOrder<'_>) -> Result<OrderReceipt> {
  let payment_details = serde_json::to_string(order.masked_payment)
    .map_err(|e| AppError::Internal(format!("Failed to encode payment details: {}", e)))?;
  let created_at = Utc::now();

  let mut tx = pool.begin().await?;

  let (order_id,): (i64,) = sqlx::query_as(
    "INSERT INTO orders (created_at, total_cents, payment_key, payment_details) VALUES (?, ?, ?, ?) RETURNING id",
  )
  .bind(created_at)
  .bind(order.total.0)
  .bind(order.payment_key)
  .bind(&payment_details)
  .fetch_one(&mut *tx)
  .await?;

  for line in order.lines {
    let unit_price = order.unit_prices.get(&line.item_id).copied().ok_or_else(|| {
      AppError::Internal(format!("No resolved price for item {} in order {}", line.item_id, order_id))
    })?;
    sqlx::query("INSERT INTO order_items (order_id, item_id, quantity, unit_price_cents) VALUES (?, ?, ?, ?)")
      .bind(order_id)
      .bind(line.item_id)
      .bind(line.quantity)
      .bind(unit_price.0)
      .execute(&mut *tx)
      .await?;
  }

  tx.commit().await?;
  info!(order_id, "Order persisted.");

  Ok(OrderReceipt {
    id: order_id,
    timestamp: created_at,
    total: order.total,
  })
}

#[instrument(name = "order_repo::get_order", skip(pool))]
pub async fn get_order(pool: &SqlitePool, order_id: i64) -> Result<OrderDetail> {
  let order: Option<OrderRecord> = sqlx::query_as(
    "SELECT id, created_at, total_cents, payment_key, payment_details FROM orders WHERE id = ?",
  )
  .bind(order_id)
  .fetch_optional(pool)
  .await?;

  let Some(order) = order else {
    warn!("Order with ID {} not found.", order_id);
    return Err(AppError::NotFound(format!("Order with ID {} not found", order_id)));
  };

  let lines: Vec<OrderItemRecord> = sqlx::query_as(
    "SELECT id, order_id, item_id, quantity, unit_price_cents FROM order_items WHERE order_id = ? ORDER BY id ASC",
  )
  .bind(order_id)
  .fetch_all(pool)
  .await?;

  Ok(OrderDetail {
    id: order.id,
    timestamp: order.created_at,
    total: Cents(order.total_cents),
    payment_key: order.payment_key,
    items: lines.into_iter().map(OrderLine::from).collect(),
  })
}

/// The masked payment stored with an order.
#[instrument(name = "order_repo::get_masked_payment", skip(pool))]
pub async fn get_masked_payment(pool: &SqlitePool, order_id: i64) -> Result<MaskedPayment> {
  let details: Option<(String,)> = sqlx::query_as("SELECT payment_details FROM orders WHERE id = ?")
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
  let (details,) = details.ok_or_else(|| AppError::NotFound(format!("Order with ID {} not found", order_id)))?;
  serde_json::from_str(&details).map_err(|e| AppError::Internal(format!("Corrupt payment details: {}", e)))
}
