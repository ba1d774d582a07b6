// kiosk/src/services/payment_mock.rs
use crate::errors::{AppError, Result as AppResult};
use kiosk_core::{Cents, MaskedPayment, PaymentSnapshot};
use tracing::{info, instrument};
use uuid::Uuid;

/// Result of a simulated capture: an opaque key to store with the order and
/// the masked card record. The raw card never leaves this function.
#[derive(Debug, Clone)]
pub struct CapturedPayment {
  pub payment_key: String,
  pub masked: MaskedPayment,
}

/// No processor is contacted; a well-formed snapshot for a positive amount is
/// always captured.
#[instrument(name = "payment_mock::capture", skip(payment), fields(amount = %amount))]
pub async fn capture(payment: &PaymentSnapshot, amount: Cents) -> AppResult<CapturedPayment> {
  if !amount.is_positive() {
    return Err(AppError::validation("Amount must be greater than zero"));
  }

  let payment_key = format!("pay_{}", Uuid::new_v4().simple());
  let masked = payment.masked();
  info!(payment_key = %payment_key, card = %masked.card_number, "Simulated payment captured.");

  Ok(CapturedPayment { payment_key, masked })
}
