// kiosk-core/src/catalog.rs

//! Menu catalog types and the rules a catalog entry must satisfy before it is
//! written by the seeding job.

use crate::money::Cents;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_CATEGORY_NAME_LEN: usize = 100;
pub const MAX_ITEM_NAME_LEN: usize = 200;
pub const MAX_IMAGE_REF_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub id: i64,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
  pub id: i64,
  pub category_id: i64,
  pub name: String,
  pub price: Cents,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_id: Option<String>,
}

/// Categories and items together, as served for the initial page load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
  pub categories: Vec<Category>,
  pub items: Vec<Item>,
}

impl Menu {
  pub fn item(&self, item_id: i64) -> Option<&Item> {
    self.items.iter().find(|item| item.id == item_id)
  }

  /// Items of one category, or every item when `category_id` is `None`.
  /// An unknown category yields an empty list.
  pub fn items_in(&self, category_id: Option<i64>) -> Vec<&Item> {
    self
      .items
      .iter()
      .filter(|item| category_id.map_or(true, |id| item.category_id == id))
      .collect()
  }
}

// --- Seed input ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
  pub name: String,
  #[serde(default)]
  pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
  pub name: String,
  pub price: Cents,
  pub category_id: i64,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub image_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogRejection {
  #[error("{entity} name is required and cannot be empty")]
  EmptyName { entity: &'static str },

  #[error("{entity} name cannot exceed {max} characters")]
  NameTooLong { entity: &'static str, max: usize },

  #[error("a category named '{0}' already exists")]
  DuplicateCategory(String),

  #[error("an item named '{name}' already exists in category {category_id}")]
  DuplicateItem { name: String, category_id: i64 },

  #[error("price must be greater than 0")]
  NonPositivePrice,

  #[error("category with ID {0} does not exist")]
  UnknownCategory(i64),

  #[error("image reference cannot exceed 255 characters")]
  ImageRefTooLong,
}

fn check_name(entity: &'static str, name: &str, max: usize) -> Result<(), CatalogRejection> {
  let trimmed = name.trim();
  if trimmed.is_empty() {
    return Err(CatalogRejection::EmptyName { entity });
  }
  if trimmed.chars().count() > max {
    return Err(CatalogRejection::NameTooLong { entity, max });
  }
  Ok(())
}

fn check_image_ref(image: Option<&str>) -> Result<(), CatalogRejection> {
  match image {
    Some(image) if image.chars().count() > MAX_IMAGE_REF_LEN => Err(CatalogRejection::ImageRefTooLong),
    _ => Ok(()),
  }
}

impl NewCategory {
  /// Checks this category against the ones already stored.
  pub fn validate(&self, existing: &[Category]) -> Result<(), CatalogRejection> {
    check_name("category", &self.name, MAX_CATEGORY_NAME_LEN)?;
    let wanted = self.name.trim().to_lowercase();
    if existing.iter().any(|c| c.name.trim().to_lowercase() == wanted) {
      return Err(CatalogRejection::DuplicateCategory(self.name.trim().to_string()));
    }
    check_image_ref(self.image.as_deref())
  }
}

impl NewItem {
  /// Checks this item against the stored categories and the items already in
  /// its category.
  pub fn validate(&self, categories: &[Category], existing_items: &[Item]) -> Result<(), CatalogRejection> {
    check_name("item", &self.name, MAX_ITEM_NAME_LEN)?;
    if !self.price.is_positive() {
      return Err(CatalogRejection::NonPositivePrice);
    }
    if !categories.iter().any(|c| c.id == self.category_id) {
      return Err(CatalogRejection::UnknownCategory(self.category_id));
    }
    let wanted = self.name.trim().to_lowercase();
    let duplicate = existing_items
      .iter()
      .filter(|item| item.category_id == self.category_id)
      .any(|item| item.name.trim().to_lowercase() == wanted);
    if duplicate {
      return Err(CatalogRejection::DuplicateItem {
        name: self.name.trim().to_string(),
        category_id: self.category_id,
      });
    }
    check_image_ref(self.image_id.as_deref())
  }
}
