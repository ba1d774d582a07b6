// kiosk-core/src/checkout.rs

//! Order submission rules and the wire types shared by the server and the
//! storefront.
//!
//! The checks run in a fixed order: line items present, every item known,
//! every quantity positive, total reconciled, payment well-formed. Each
//! failure kind is its own [`OrderRejection`] variant.

use crate::money::Cents;
use crate::payment::{PaymentFieldError, PaymentSnapshot};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest accepted gap between the declared and the recomputed total.
pub const TOTAL_TOLERANCE: Cents = Cents(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
  pub item_id: i64,
  pub quantity: i64,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
  pub items: Vec<LineItem>,
  /// Client-declared total in dollars.
  pub total: f64,
  pub payment: PaymentSnapshot,
}

/// Response of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
  pub id: i64,
  pub timestamp: DateTime<Utc>,
  pub total: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
  pub id: i64,
  pub item_id: i64,
  pub quantity: i64,
  pub unit_price: Cents,
}

/// Response of `GET /orders/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetail {
  pub id: i64,
  pub timestamp: DateTime<Utc>,
  pub total: Cents,
  pub payment_key: String,
  pub items: Vec<OrderLine>,
}

/// How the declared total is weighed against current catalog prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TotalPolicy {
  /// Reject when the declared total is off by more than [`TOTAL_TOLERANCE`].
  #[default]
  Enforce,
  /// Store the recomputed total whatever the client declared.
  Recompute,
  /// Store the declared total as sent.
  Trust,
}

impl FromStr for TotalPolicy {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "enforce" => Ok(TotalPolicy::Enforce),
      "recompute" => Ok(TotalPolicy::Recompute),
      "trust" => Ok(TotalPolicy::Trust),
      other => Err(format!(
        "unknown total policy '{}', expected enforce, recompute or trust",
        other
      )),
    }
  }
}

impl fmt::Display for TotalPolicy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      TotalPolicy::Enforce => "enforce",
      TotalPolicy::Recompute => "recompute",
      TotalPolicy::Trust => "trust",
    };
    f.write_str(name)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderRejection {
  #[error("order must contain at least one item")]
  NoLineItems,

  #[error("unknown item: item with ID {0} not found")]
  UnknownItem(i64),

  #[error("invalid quantity {quantity} for item {item_id}")]
  InvalidQuantity { index: usize, item_id: i64, quantity: i64 },

  #[error("total must be a positive amount")]
  InvalidTotal,

  #[error("total mismatch: expected {expected}, received {declared}")]
  TotalMismatch { expected: Cents, declared: Cents },

  #[error("invalid payment details: {}", describe_fields(.0))]
  InvalidPayment(Vec<PaymentFieldError>),
}

fn describe_fields(errors: &[PaymentFieldError]) -> String {
  errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

impl OrderRejection {
  /// Request fields the rejection points at, in wire notation.
  pub fn fields(&self) -> Vec<String> {
    match self {
      OrderRejection::NoLineItems => vec!["items".to_string()],
      OrderRejection::UnknownItem(_) => Vec::new(),
      OrderRejection::InvalidQuantity { index, .. } => vec![format!("items[{}].quantity", index)],
      OrderRejection::InvalidTotal | OrderRejection::TotalMismatch { .. } => vec!["total".to_string()],
      OrderRejection::InvalidPayment(errors) => errors.iter().map(|e| format!("payment.{}", e.field)).collect(),
    }
  }
}

pub fn check_line_items_present(lines: &[LineItem]) -> Result<(), OrderRejection> {
  if lines.is_empty() {
    return Err(OrderRejection::NoLineItems);
  }
  Ok(())
}

/// Maps every line's item to its current price. The first line whose item is
/// missing from `catalog_prices` is reported.
pub fn resolve_prices(
  lines: &[LineItem],
  catalog_prices: &HashMap<i64, Cents>,
) -> Result<HashMap<i64, Cents>, OrderRejection> {
  let mut resolved = HashMap::with_capacity(lines.len());
  for line in lines {
    let price = catalog_prices
      .get(&line.item_id)
      .copied()
      .ok_or(OrderRejection::UnknownItem(line.item_id))?;
    resolved.insert(line.item_id, price);
  }
  Ok(resolved)
}

pub fn check_quantities(lines: &[LineItem]) -> Result<(), OrderRejection> {
  match lines.iter().enumerate().find(|(_, line)| line.quantity <= 0) {
    Some((index, line)) => Err(OrderRejection::InvalidQuantity {
      index,
      item_id: line.item_id,
      quantity: line.quantity,
    }),
    None => Ok(()),
  }
}

/// Σ unit price × quantity. Overflow is reported against the offending line.
pub fn compute_total(lines: &[LineItem], prices: &HashMap<i64, Cents>) -> Result<Cents, OrderRejection> {
  let mut total = Cents::ZERO;
  for (index, line) in lines.iter().enumerate() {
    let price = prices
      .get(&line.item_id)
      .copied()
      .ok_or(OrderRejection::UnknownItem(line.item_id))?;
    total = price
      .checked_mul(line.quantity)
      .and_then(|subtotal| total.checked_add(subtotal))
      .ok_or(OrderRejection::InvalidQuantity {
        index,
        item_id: line.item_id,
        quantity: line.quantity,
      })?;
  }
  Ok(total)
}

/// Decides the total to persist.
pub fn reconcile_total(
  lines: &[LineItem],
  prices: &HashMap<i64, Cents>,
  declared: f64,
  policy: TotalPolicy,
) -> Result<Cents, OrderRejection> {
  let declared = Cents::from_dollars(declared)
    .filter(|c| c.is_positive())
    .ok_or(OrderRejection::InvalidTotal)?;
  let computed = compute_total(lines, prices)?;

  match policy {
    TotalPolicy::Enforce => {
      if computed.distance(declared) > TOTAL_TOLERANCE {
        return Err(OrderRejection::TotalMismatch {
          expected: computed,
          declared,
        });
      }
      Ok(declared)
    }
    TotalPolicy::Recompute => Ok(computed),
    TotalPolicy::Trust => Ok(declared),
  }
}

pub fn check_payment(payment: &PaymentSnapshot, today: NaiveDate) -> Result<(), OrderRejection> {
  payment.validate(today).map_err(OrderRejection::InvalidPayment)
}

/// Runs every rule in order against an in-memory price list.
///
/// The server runs the same checks one flow step at a time, with the price
/// lookup going to the database.
pub fn validate_order(
  request: &OrderRequest,
  catalog_prices: &HashMap<i64, Cents>,
  policy: TotalPolicy,
  today: NaiveDate,
) -> Result<Cents, OrderRejection> {
  check_line_items_present(&request.items)?;
  let prices = resolve_prices(&request.items, catalog_prices)?;
  check_quantities(&request.items)?;
  let total = reconcile_total(&request.items, &prices, request.total, policy)?;
  check_payment(&request.payment, today)?;
  Ok(total)
}
