// kiosk/src/models/item.rs
use kiosk_core::{Cents, Item};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ItemRecord {
  pub id: i64,
  pub category_id: i64,
  pub name: String,
  pub price_cents: i64,
  pub description: Option<String>,
  pub image_id: Option<String>,
}

impl From<ItemRecord> for Item {
  fn from(record: ItemRecord) -> Self {
    Item {
      id: record.id,
      category_id: record.category_id,
      name: record.name,
      price: Cents(record.price_cents),
      description: record.description,
      image_id: record.image_id,
    }
  }
}
