// kiosk/src/models/order_item.rs
use kiosk_core::{Cents, OrderLine};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct OrderItemRecord {
  pub id: i64,
  pub order_id: i64,
  pub item_id: i64,
  pub quantity: i64,
  pub unit_price_cents: i64,
}

impl From<OrderItemRecord> for OrderLine {
  fn from(record: OrderItemRecord) -> Self {
    OrderLine {
      id: record.id,
      item_id: record.item_id,
      quantity: record.quantity,
      unit_price: Cents(record.unit_price_cents),
    }
  }
}
