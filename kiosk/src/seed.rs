// kiosk/src/seed.rs

//! Out-of-band catalog seeding from a JSON file.
//!
//! Items name their category by its 1-based position in the file's
//! `categories` list. The whole file goes in one transaction and only into an
//! empty catalog.

use crate::errors::{AppError, Result};
use anyhow::Context;
use kiosk_core::{Category, Item, NewCategory, NewItem};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct SeedData {
  pub categories: Vec<NewCategory>,
  #[serde(default)]
  pub items: Vec<NewItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
  Seeded { categories: usize, items: usize },
  SkippedNonEmpty,
}

fn read_seed_file(path: &Path) -> anyhow::Result<SeedData> {
  let raw = std::fs::read_to_string(path).with_context(|| format!("Cannot read seed file {}", path.display()))?;
  let data = serde_json::from_str(&raw).with_context(|| format!("Invalid seed file {}", path.display()))?;
  Ok(data)
}

/// Reads and parses a seed file. The error carries the whole cause chain.
pub fn load_seed_file(path: &Path) -> Result<SeedData> {
  read_seed_file(path).map_err(|e| AppError::Seed(format!("{:#}", e)))
}

fn trimmed(value: &Option<String>) -> Option<String> {
  value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

#[instrument(name = "seed::seed_catalog", skip(pool, data), fields(categories = data.categories.len(), items = data.items.len()))]
pub async fn seed_catalog(pool: &SqlitePool, data: &SeedData) -> Result<SeedOutcome> {
  let mut tx = pool.begin().await?;

  let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories").fetch_one(&mut *tx).await?;
  if existing > 0 {
    info!(existing, "Catalog already populated, skipping seed.");
    return Ok(SeedOutcome::SkippedNonEmpty);
  }

  let mut categories: Vec<Category> = Vec::with_capacity(data.categories.len());
  for (index, new_category) in data.categories.iter().enumerate() {
    new_category
      .validate(&categories)
      .map_err(|e| AppError::Seed(format!("category #{}: {}", index + 1, e)))?;

    let name = new_category.name.trim().to_string();
    let image = trimmed(&new_category.image);
    let (id,): (i64,) = sqlx::query_as("INSERT INTO categories (name, image) VALUES (?, ?) RETURNING id")
      .bind(&name)
      .bind(&image)
      .fetch_one(&mut *tx)
      .await?;
    categories.push(Category { id, name, image });
  }

  let mut items: Vec<Item> = Vec::with_capacity(data.items.len());
  for (index, new_item) in data.items.iter().enumerate() {
    let position = usize::try_from(new_item.category_id).ok().filter(|p| *p >= 1);
    let category_id = position
      .and_then(|p| categories.get(p - 1))
      .map(|c| c.id)
      .ok_or_else(|| {
        AppError::Seed(format!(
          "item #{}: category position {} does not exist",
          index + 1,
          new_item.category_id
        ))
      })?;

    let resolved = NewItem {
      category_id,
      ..new_item.clone()
    };
    resolved
      .validate(&categories, &items)
      .map_err(|e| AppError::Seed(format!("item #{}: {}", index + 1, e)))?;

    let name = resolved.name.trim().to_string();
    let description = trimmed(&resolved.description);
    let image_id = trimmed(&resolved.image_id);
    let (id,): (i64,) = sqlx::query_as(
      "INSERT INTO items (category_id, name, price_cents, description, image_id) VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(category_id)
    .bind(&name)
    .bind(resolved.price.0)
    .bind(&description)
    .bind(&image_id)
    .fetch_one(&mut *tx)
    .await?;

    items.push(Item {
      id,
      category_id,
      name,
      price: resolved.price,
      description,
      image_id,
    });
  }

  tx.commit().await?;
  info!(categories = categories.len(), items = items.len(), "Catalog seeded.");
  Ok(SeedOutcome::Seeded {
    categories: categories.len(),
    items: items.len(),
  })
}

/// Loads and applies the configured seed file.
pub async fn seed_from_file(pool: &SqlitePool, path: &Path) -> Result<SeedOutcome> {
  let data = load_seed_file(path).map_err(|e| {
    warn!(error = %e, "Seed file could not be loaded.");
    e
  })?;
  seed_catalog(pool, &data).await
}
