// kiosk/src/models/category.rs
use kiosk_core::Category;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct CategoryRecord {
  pub id: i64,
  pub name: String,
  pub image: Option<String>,
}

impl From<CategoryRecord> for Category {
  fn from(record: CategoryRecord) -> Self {
    Category {
      id: record.id,
      name: record.name,
      image: record.image,
    }
  }
}
