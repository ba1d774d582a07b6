// kiosk/src/services/order_service.rs

use crate::errors::{AppError, Result as AppResult};
use crate::pipelines::contexts::SubmitOrderCtxData;
use crate::repository::order_repo;
use crate::state::AppState;
use chrono::Utc;
use kiosk_core::{ContextData, FlowOutcome, OrderDetail, OrderReceipt, OrderRequest};
use tracing::{error, info, instrument, warn};

/// Runs the checkout flow for one submission and returns the stored order.
#[instrument(name = "order_service::submit_order", skip(app_state, request), fields(lines = request.items.len()))]
pub async fn submit_order(app_state: &AppState, request: OrderRequest) -> AppResult<OrderReceipt> {
  let today = Utc::now().date_naive();
  let ctx_data = ContextData::new(SubmitOrderCtxData::new(app_state.clone(), request, today));

  match app_state.flow_registry.run(ctx_data.clone()).await {
    Ok(FlowOutcome::Completed) => {
      let receipt = ctx_data.read().receipt.clone();
      match receipt {
        Some(receipt) => {
          info!(order_id = receipt.id, total = %receipt.total, "Order submitted.");
          Ok(receipt)
        }
        None => {
          error!("Checkout flow completed without storing an order.");
          Err(AppError::Internal("Checkout completed without an order".to_string()))
        }
      }
    }
    Ok(FlowOutcome::Stopped) => {
      warn!("Checkout flow was stopped by a handler.");
      Err(AppError::FlowHalted)
    }
    Err(e) => Err(e),
  }
}

pub async fn fetch_order(app_state: &AppState, order_id: i64) -> AppResult<OrderDetail> {
  order_repo::get_order(&app_state.db_pool, order_id).await
}
