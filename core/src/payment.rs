// kiosk-core/src/payment.rs

//! Payment snapshot captured at checkout.
//!
//! The snapshot is only ever validated, masked and stored. Nothing here talks
//! to a payment processor.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const CARD_NUMBER_DIGITS: std::ops::RangeInclusive<usize> = 13..=19;
pub const CVV_DIGITS: std::ops::RangeInclusive<usize> = 3..=4;

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingAddress {
  #[serde(default)]
  pub street: String,
  #[serde(default)]
  pub city: String,
  #[serde(default)]
  pub state: String,
  #[serde(default)]
  pub zip: String,
}

impl fmt::Debug for BillingAddress {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("BillingAddress")
      .field("city", &self.city)
      .field("state", &self.state)
      .finish_non_exhaustive()
  }
}

/// Card and billing data as submitted by the kiosk.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSnapshot {
  pub card_number: String,
  pub card_holder_name: String,
  pub expiry_month: i64,
  pub expiry_year: i64,
  pub cvv: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub billing_address: Option<BillingAddress>,
}

// Card number and CVV never reach a log line.
impl fmt::Debug for PaymentSnapshot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PaymentSnapshot")
      .field("card_number", &mask_card_number(&self.card_number))
      .field("card_holder_name", &self.card_holder_name)
      .field("expiry_month", &self.expiry_month)
      .field("expiry_year", &self.expiry_year)
      .field("cvv", &"***")
      .field("billing_address", &self.billing_address)
      .finish()
  }
}

/// One offending payment field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct PaymentFieldError {
  pub field: &'static str,
  pub message: String,
}

impl PaymentFieldError {
  fn new(field: &'static str, message: impl Into<String>) -> Self {
    Self {
      field,
      message: message.into(),
    }
  }
}

/// What is kept about a payment once the order is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskedPayment {
  pub card_number: String,
  pub card_holder_name: String,
  pub expiry_month: i64,
  pub expiry_year: i64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub billing_address: Option<BillingAddress>,
}

fn card_digits(raw: &str) -> Option<String> {
  let compact: String = raw.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
  if compact.chars().all(|c| c.is_ascii_digit()) {
    Some(compact)
  } else {
    None
  }
}

/// `**** **** **** 1234`, or all stars when fewer than four digits are present.
pub fn mask_card_number(raw: &str) -> String {
  let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
  if digits.len() < 4 {
    return "****".to_string();
  }
  format!("**** **** **** {}", &digits[digits.len() - 4..])
}

impl PaymentSnapshot {
  /// Checks every field and reports all offenders at once.
  pub fn validate(&self, today: NaiveDate) -> Result<(), Vec<PaymentFieldError>> {
    let mut errors = Vec::new();

    match card_digits(&self.card_number) {
      Some(digits) if CARD_NUMBER_DIGITS.contains(&digits.len()) => {}
      Some(_) => errors.push(PaymentFieldError::new(
        "card_number",
        format!(
          "card number must have {} to {} digits",
          CARD_NUMBER_DIGITS.start(),
          CARD_NUMBER_DIGITS.end()
        ),
      )),
      None => errors.push(PaymentFieldError::new("card_number", "card number may only contain digits")),
    }

    if self.card_holder_name.trim().is_empty() {
      errors.push(PaymentFieldError::new("card_holder_name", "card holder name is required"));
    }

    if !(1..=12).contains(&self.expiry_month) {
      errors.push(PaymentFieldError::new("expiry_month", "expiry month must be between 1 and 12"));
    }

    let current_year = i64::from(today.year());
    if self.expiry_year < current_year {
      errors.push(PaymentFieldError::new(
        "expiry_year",
        format!("expiry year must be {} or later", current_year),
      ));
    }

    let cvv_ok = CVV_DIGITS.contains(&self.cvv.len()) && self.cvv.chars().all(|c| c.is_ascii_digit());
    if !cvv_ok {
      errors.push(PaymentFieldError::new("cvv", "cvv must be 3 or 4 digits"));
    }

    if errors.is_empty() {
      Ok(())
    } else {
      Err(errors)
    }
  }

  /// Drops the CVV and all but the last four card digits.
  pub fn masked(&self) -> MaskedPayment {
    MaskedPayment {
      card_number: mask_card_number(&self.card_number),
      card_holder_name: self.card_holder_name.trim().to_string(),
      expiry_month: self.expiry_month,
      expiry_year: self.expiry_year,
      billing_address: self.billing_address.clone(),
    }
  }
}
