// kiosk/src/pipelines/contexts.rs

//! Data carried through the server's flows. Handlers receive these wrapped in
//! `kiosk_core::ContextData`.

use crate::services::payment_mock::CapturedPayment;
use crate::state::AppState;
use chrono::NaiveDate;
use kiosk_core::{Cents, OrderReceipt, OrderRequest};
use std::collections::HashMap;

#[derive(Clone)]
pub struct SubmitOrderCtxData {
  pub app_state: AppState,
  pub request: OrderRequest,
  /// Card expiry is judged against this date.
  pub today: NaiveDate,

  // Filled in step by step.
  pub unit_prices: HashMap<i64, Cents>,
  pub total: Option<Cents>,
  pub payment: Option<CapturedPayment>,
  pub receipt: Option<OrderReceipt>,
}

impl SubmitOrderCtxData {
  pub fn new(app_state: AppState, request: OrderRequest, today: NaiveDate) -> Self {
    Self {
      app_state,
      request,
      today,
      unit_prices: HashMap::new(),
      total: None,
      payment: None,
      receipt: None,
    }
  }
}
