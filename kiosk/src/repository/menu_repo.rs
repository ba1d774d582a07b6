// kiosk/src/repository/menu_repo.rs

use crate::errors::{AppError, Result};
use crate::models::{CategoryRecord, ItemRecord};
use kiosk_core::{Category, Cents, Item, Menu};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::{BTreeSet, HashMap};
use tracing::{error, info, instrument, warn};

const ITEM_COLUMNS: &str = "id, category_id, name, price_cents, description, image_id";

#[instrument(name = "menu_repo::list_categories", skip(pool))]
pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<Category>> {
  let records: Vec<CategoryRecord> = sqlx::query_as("SELECT id, name, image FROM categories ORDER BY id ASC")
    .fetch_all(pool)
    .await
    .map_err(|e| {
      error!("Failed to fetch categories from database: {}", e);
      AppError::Sqlx(e)
    })?;
  Ok(records.into_iter().map(Category::from).collect())
}

/// Items ordered by id. An unknown `category_id` yields an empty list.
#[instrument(name = "menu_repo::list_items", skip(pool))]
pub async fn list_items(pool: &SqlitePool, category_id: Option<i64>) -> Result<Vec<Item>> {
  let sql = format!(
    "SELECT {} FROM items WHERE (? IS NULL OR category_id = ?) ORDER BY id ASC",
    ITEM_COLUMNS
  );
  let records: Vec<ItemRecord> = sqlx::query_as(&sql)
    .bind(category_id)
    .bind(category_id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
      error!("Failed to fetch items from database: {}", e);
      AppError::Sqlx(e)
    })?;
  Ok(records.into_iter().map(Item::from).collect())
}

#[instrument(name = "menu_repo::get_item", skip(pool))]
pub async fn get_item(pool: &SqlitePool, item_id: i64) -> Result<Item> {
  let sql = format!("SELECT {} FROM items WHERE id = ?", ITEM_COLUMNS);
  let record: Option<ItemRecord> = sqlx::query_as(&sql).bind(item_id).fetch_optional(pool).await?;

  match record {
    Some(record) => Ok(record.into()),
    None => {
      warn!("Item with ID {} not found.", item_id);
      Err(AppError::NotFound(format!("Item with ID {} not found", item_id)))
    }
  }
}

#[instrument(name = "menu_repo::get_menu", skip(pool))]
pub async fn get_menu(pool: &SqlitePool) -> Result<Menu> {
  let categories = list_categories(pool).await?;
  let items = list_items(pool, None).await?;
  info!(categories = categories.len(), items = items.len(), "Menu loaded.");
  Ok(Menu { categories, items })
}

/// Current prices of the given items. Ids with no matching row are simply
/// absent from the map.
#[instrument(name = "menu_repo::prices_for", skip(pool, item_ids), fields(requested = item_ids.len()))]
pub async fn prices_for(pool: &SqlitePool, item_ids: &[i64]) -> Result<HashMap<i64, Cents>> {
  let unique: BTreeSet<i64> = item_ids.iter().copied().collect();
  if unique.is_empty() {
    return Ok(HashMap::new());
  }

  let mut query = QueryBuilder::<Sqlite>::new("SELECT id, price_cents FROM items WHERE id IN (");
  let mut separated = query.separated(", ");
  for id in &unique {
    separated.push_bind(*id);
  }
  separated.push_unseparated(")");

  let rows: Vec<(i64, i64)> = query.build_query_as().fetch_all(pool).await?;
  Ok(rows.into_iter().map(|(id, cents)| (id, Cents(cents))).collect())
}
