// kiosk-core/src/storefront/form.rs

use crate::payment::{BillingAddress, PaymentSnapshot};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Inline form messages keyed by field name.
pub type FieldErrors = BTreeMap<&'static str, String>;

pub const FORM_FIELDS: [&str; 9] = [
  "card_number",
  "card_holder_name",
  "expiry_month",
  "expiry_year",
  "cvv",
  "street",
  "city",
  "state",
  "zip",
];

/// The checkout form exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
  pub card_number: String,
  pub card_holder_name: String,
  pub expiry_month: String,
  pub expiry_year: String,
  pub cvv: String,
  pub street: String,
  pub city: String,
  pub state: String,
  pub zip: String,
}

fn parse_number(raw: &str, field: &'static str, errors: &mut FieldErrors) -> i64 {
  match raw.trim().parse::<i64>() {
    Ok(value) => value,
    Err(_) => {
      errors.insert(field, "must be a number".to_string());
      0
    }
  }
}

impl CheckoutForm {
  fn billing_address(&self) -> Option<BillingAddress> {
    let address = BillingAddress {
      street: self.street.trim().to_string(),
      city: self.city.trim().to_string(),
      state: self.state.trim().to_string(),
      zip: self.zip.trim().to_string(),
    };
    let any_filled = [&address.street, &address.city, &address.state, &address.zip]
      .iter()
      .any(|part| !part.is_empty());
    any_filled.then_some(address)
  }

  /// Turns the form into a payment snapshot, or returns one message per bad field.
  pub fn to_payment(&self, today: NaiveDate) -> Result<PaymentSnapshot, FieldErrors> {
    let mut errors = FieldErrors::new();
    let expiry_month = parse_number(&self.expiry_month, "expiry_month", &mut errors);
    let expiry_year = parse_number(&self.expiry_year, "expiry_year", &mut errors);

    let snapshot = PaymentSnapshot {
      card_number: self.card_number.trim().to_string(),
      card_holder_name: self.card_holder_name.trim().to_string(),
      expiry_month,
      expiry_year,
      cvv: self.cvv.trim().to_string(),
      billing_address: self.billing_address(),
    };

    if let Err(field_errors) = snapshot.validate(today) {
      for field_error in field_errors {
        // A parse failure is the more useful message for that field.
        errors.entry(field_error.field).or_insert(field_error.message);
      }
    }

    if errors.is_empty() {
      Ok(snapshot)
    } else {
      Err(errors)
    }
  }
}
