// kiosk/src/pipelines/checkout_pipeline.rs

//! The order submission flow. Every rule runs before anything is written;
//! `persist_order` is the only step that touches the orders tables.

use crate::errors::{AppError, Result};
use crate::pipelines::contexts::SubmitOrderCtxData;
use crate::repository::menu_repo;
use crate::repository::order_repo::{self, NewOrder};
use crate::services::payment_mock;
use kiosk_core::checkout;
use kiosk_core::{ContextData, Flow, FlowControl, FlowRegistry, OrderRejection, TotalPolicy};
use tracing::{info, warn};

pub const CHECKOUT_FLOW: &str = "checkout";

pub const CHECKOUT_STEPS: &[(&str, bool)] = &[
  ("check_line_items_present", false),
  ("resolve_catalog_items", false),
  ("check_quantities", false),
  ("reconcile_total", false),
  ("validate_payment", false),
  ("capture_payment", false),
  ("persist_order", false),
];

type Ctx = ContextData<SubmitOrderCtxData>;

pub fn build_checkout_flow() -> Flow<SubmitOrderCtxData, AppError> {
  let mut p = Flow::<SubmitOrderCtxData, AppError>::new(CHECKOUT_FLOW, CHECKOUT_STEPS);

  p.on("check_line_items_present", check_line_items_present);
  p.on("resolve_catalog_items", resolve_catalog_items);
  p.on("check_quantities", check_quantities);
  p.on("reconcile_total", reconcile_total);
  p.on("validate_payment", validate_payment);
  p.on("capture_payment", capture_payment);
  p.on("persist_order", persist_order);

  p
}

pub fn register_checkout_pipeline(flow_registry: &FlowRegistry<AppError>) {
  flow_registry.register(build_checkout_flow());
}

async fn check_line_items_present(ctx_data: Ctx) -> Result<FlowControl> {
  checkout::check_line_items_present(&ctx_data.read().request.items)?;
  Ok(FlowControl::Continue)
}

async fn resolve_catalog_items(ctx_data: Ctx) -> Result<FlowControl> {
  let (pool, lines) = {
    let guard = ctx_data.read();
    (guard.app_state.db_pool.clone(), guard.request.items.clone())
  };

  let item_ids: Vec<i64> = lines.iter().map(|line| line.item_id).collect();
  let catalog_prices = menu_repo::prices_for(&pool, &item_ids).await?;
  let unit_prices = checkout::resolve_prices(&lines, &catalog_prices).map_err(|rejection| {
    warn!(error = %rejection, "Order references an unknown item.");
    rejection
  })?;

  ctx_data.write().unit_prices = unit_prices;
  Ok(FlowControl::Continue)
}

async fn check_quantities(ctx_data: Ctx) -> Result<FlowControl> {
  checkout::check_quantities(&ctx_data.read().request.items)?;
  Ok(FlowControl::Continue)
}

async fn reconcile_total(ctx_data: Ctx) -> Result<FlowControl> {
  let mut guard = ctx_data.write();
  let policy: TotalPolicy = guard.app_state.config.total_policy;
  let declared = guard.request.total;

  let total = match checkout::reconcile_total(&guard.request.items, &guard.unit_prices, declared, policy) {
    Ok(total) => total,
    Err(rejection @ OrderRejection::TotalMismatch { .. }) => {
      warn!(%policy, error = %rejection, "Declared total does not match catalog prices.");
      return Err(rejection.into());
    }
    Err(rejection) => return Err(rejection.into()),
  };

  info!(%policy, total = %total, "Order total settled.");
  guard.total = Some(total);
  Ok(FlowControl::Continue)
}

async fn validate_payment(ctx_data: Ctx) -> Result<FlowControl> {
  let guard = ctx_data.read();
  checkout::check_payment(&guard.request.payment, guard.today)?;
  Ok(FlowControl::Continue)
}

async fn capture_payment(ctx_data: Ctx) -> Result<FlowControl> {
  let (payment, total) = {
    let guard = ctx_data.read();
    (guard.request.payment.clone(), guard.total)
  };
  let total = total.ok_or_else(|| AppError::Internal("capture_payment ran before reconcile_total".to_string()))?;

  let captured = payment_mock::capture(&payment, total).await?;
  ctx_data.write().payment = Some(captured);
  Ok(FlowControl::Continue)
}

async fn persist_order(ctx_data: Ctx) -> Result<FlowControl> {
  let (pool, lines, unit_prices, total, captured) = {
    let guard = ctx_data.read();
    (
      guard.app_state.db_pool.clone(),
      guard.request.items.clone(),
      guard.unit_prices.clone(),
      guard.total,
      guard.payment.clone(),
    )
  };
  let (Some(total), Some(captured)) = (total, captured) else {
    return Err(AppError::Internal(
      "persist_order ran before the total and payment were settled".to_string(),
    ));
  };

  let receipt = order_repo::insert_order(
    &pool,
    &NewOrder {
      lines: &lines,
      unit_prices: &unit_prices,
      total,
      payment_key: &captured.payment_key,
      masked_payment: &captured.masked,
    },
  )
  .await?;

  ctx_data.write().receipt = Some(receipt);
  Ok(FlowControl::Continue)
}
