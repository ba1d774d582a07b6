// kiosk-core/src/cart.rs

//! Client-side cart: a pure reducer over one session's basket.
//!
//! The cart is never sent to the server as-is. At checkout it is flattened into
//! [`LineItem`]s plus a declared total.

use crate::catalog::Item;
use crate::checkout::LineItem;
use crate::money::Cents;
use serde::{Deserialize, Serialize};

/// What the cart needs to know about a menu item when it is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
  pub id: i64,
  pub name: String,
  pub price: Cents,
}

impl From<&Item> for CartItem {
  fn from(item: &Item) -> Self {
    CartItem {
      id: item.id,
      name: item.name.clone(),
      price: item.price,
    }
  }
}

/// One basket line. `quantity` is never 0; the entry is dropped instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
  pub id: i64,
  pub name: String,
  pub price: Cents,
  pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
  Add(CartItem),
  /// Removes one unit of the item with this id.
  Remove(i64),
  Clear,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
  pub items: Vec<CartEntry>,
  pub total: Cents,
}

impl Cart {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// Number of units across all entries.
  pub fn item_count(&self) -> u32 {
    self.items.iter().map(|e| e.quantity).sum()
  }

  pub fn quantity_of(&self, item_id: i64) -> u32 {
    self.items.iter().find(|e| e.id == item_id).map_or(0, |e| e.quantity)
  }

  /// Applies one action in place.
  ///
  /// The total is kept incrementally. An existing entry keeps the unit price
  /// it was first added with, so `total` always equals the sum of
  /// `price * quantity` over the entries.
  pub fn apply(&mut self, action: CartAction) {
    match action {
      CartAction::Add(item) => match self.items.iter_mut().find(|e| e.id == item.id) {
        Some(entry) => {
          entry.quantity += 1;
          self.total += entry.price;
        }
        None => {
          self.total += item.price;
          self.items.push(CartEntry {
            id: item.id,
            name: item.name,
            price: item.price,
            quantity: 1,
          });
        }
      },
      CartAction::Remove(item_id) => {
        let Some(idx) = self.items.iter().position(|e| e.id == item_id) else {
          return;
        };
        let price = self.items[idx].price;
        if self.items[idx].quantity > 1 {
          self.items[idx].quantity -= 1;
        } else {
          self.items.remove(idx);
        }
        self.total -= price;
      }
      CartAction::Clear => {
        self.items.clear();
        self.total = Cents::ZERO;
      }
    }
  }

  /// Sum of `price * quantity`, computed from scratch.
  pub fn recomputed_total(&self) -> Cents {
    self
      .items
      .iter()
      .map(|e| Cents(e.price.0 * i64::from(e.quantity)))
      .sum()
  }

  /// The cart as checkout line items, in insertion order.
  pub fn line_items(&self) -> Vec<LineItem> {
    self
      .items
      .iter()
      .map(|e| LineItem {
        item_id: e.id,
        quantity: i64::from(e.quantity),
      })
      .collect()
  }
}

/// Pure transition: the state after `action`, leaving `state` untouched.
pub fn reduce(state: &Cart, action: CartAction) -> Cart {
  let mut next = state.clone();
  next.apply(action);
  next
}
