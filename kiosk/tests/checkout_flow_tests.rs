// tests/checkout_flow_tests.rs
mod common;

use chrono::Utc;
use common::*;
use kiosk_core::{Cents, CheckoutForm, KioskSession, LineItem, OrderRequest, PaymentSnapshot, TotalPolicy, View};
use kiosk_server::pipelines::checkout_pipeline::{build_checkout_flow, CHECKOUT_STEPS};
use kiosk_server::pipelines::contexts::SubmitOrderCtxData;
use kiosk_server::services::order_service;
use kiosk_server::storefront_backend::LocalBackend;
use std::collections::HashSet;

fn payment() -> PaymentSnapshot {
  serde_json::from_value(payment_json()).unwrap()
}

fn request(lines: &[(i64, i64)], total: f64) -> OrderRequest {
  OrderRequest {
    items: lines.iter().map(|&(item_id, quantity)| LineItem { item_id, quantity }).collect(),
    total,
    payment: payment(),
  }
}

#[test]
fn test_checkout_steps_are_all_required_and_ordered() {
  let flow = build_checkout_flow();
  let names: Vec<_> = flow.steps().iter().map(|s| s.name.as_str()).collect();
  assert_eq!(
    names,
    vec![
      "check_line_items_present",
      "resolve_catalog_items",
      "check_quantities",
      "reconcile_total",
      "validate_payment",
      "capture_payment",
      "persist_order",
    ]
  );
  assert!(CHECKOUT_STEPS.iter().all(|(_, optional)| !optional));
}

#[tokio::test]
async fn test_checkout_flow_is_registered() {
  let state = empty_state(TotalPolicy::Enforce).await;
  assert!(state.flow_registry.is_registered::<SubmitOrderCtxData>());
}

#[tokio::test]
async fn test_burger_order_through_the_kiosk_session() {
  let state = seeded_state(TotalPolicy::Enforce).await;
  let backend = LocalBackend::new(state.clone());
  let mut session = KioskSession::new();

  session.load_menu(&backend).await.unwrap();
  assert_eq!(session.menu().items.len(), 3);

  assert!(session.add_to_cart(5));
  assert!(session.add_to_cart(5));
  assert_eq!(session.cart().total, Cents(1900));
  assert_eq!(session.cart().quantity_of(5), 2);
  assert!(session.navigate(View::Checkout));

  let form = CheckoutForm {
    card_number: "4111 1111 1111 1111".into(),
    card_holder_name: "Ada Lovelace".into(),
    expiry_month: "12".into(),
    expiry_year: "2099".into(),
    cvv: "123".into(),
    ..Default::default()
  };
  let receipt = session.checkout(&backend, &form, Utc::now().date_naive()).await.unwrap();
  assert_eq!(session.view(), View::Confirmation { order_id: receipt.id });
  assert!(session.cart().is_empty());

  let stored = order_service::fetch_order(&state, receipt.id).await.unwrap();
  assert_eq!(stored.total, Cents(1900));
  assert_eq!(stored.items.len(), 1);
  assert_eq!((stored.items[0].item_id, stored.items[0].quantity), (5, 2));
  assert_eq!(stored.items[0].unit_price, Cents(950));
}

#[tokio::test]
async fn test_kiosk_session_sees_server_rejections() {
  let state = seeded_state(TotalPolicy::Enforce).await;
  let backend = LocalBackend::new(state.clone());
  let mut session = KioskSession::new();
  session.load_menu(&backend).await.unwrap();
  session.add_to_cart(7);

  // The catalog price moves after the cart snapshot was taken.
  sqlx::query("UPDATE items SET price_cents = 250 WHERE id = 7")
    .execute(&state.db_pool)
    .await
    .unwrap();

  let form = CheckoutForm {
    card_number: "4111111111111111".into(),
    card_holder_name: "Ada Lovelace".into(),
    expiry_month: "1".into(),
    expiry_year: "2099".into(),
    cvv: "1234".into(),
    ..Default::default()
  };
  let failure = session.checkout(&backend, &form, Utc::now().date_naive()).await;
  assert!(failure.is_err());
  assert!(session.banner().unwrap().contains("total mismatch"));
  assert_eq!(session.cart().quantity_of(7), 1);
  assert_eq!(row_counts(&state).await, (0, 0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_orders_do_not_interfere() {
  let db = TempDbFile::new();
  let state = file_backed_seeded_state(TotalPolicy::Enforce, &db, 8).await;
  assert_eq!(state.db_pool.options().get_max_connections(), 8);

  const ORDERS: usize = 48;
  let shapes: [(&[(i64, i64)], f64); 3] = [(&[(5, 1)], 9.5), (&[(6, 2), (7, 1)], 7.99), (&[(5, 1), (6, 1), (7, 3)], 18.47)];

  let mut tasks = Vec::with_capacity(ORDERS);
  for n in 0..ORDERS {
    let state = state.clone();
    let (lines, total) = shapes[n % shapes.len()];
    tasks.push(tokio::spawn(async move {
      let receipt = order_service::submit_order(&state, request(lines, total)).await;
      (n % shapes.len(), receipt)
    }));
  }

  let mut ids = HashSet::new();
  let mut keys = HashSet::new();
  let mut expected_lines = 0;
  for task in tasks {
    let (shape, receipt) = task.await.unwrap();
    let receipt = receipt.unwrap();
    assert!(ids.insert(receipt.id), "duplicate order id {}", receipt.id);

    let stored = order_service::fetch_order(&state, receipt.id).await.unwrap();
    let stored_lines: Vec<_> = stored.items.iter().map(|l| (l.item_id, l.quantity)).collect();
    assert_eq!(stored_lines, shapes[shape].0.to_vec());
    assert!(keys.insert(stored.payment_key));
    expected_lines += shapes[shape].0.len() as i64;
  }

  assert_eq!(row_counts(&state).await, (ORDERS as i64, expected_lines));
  state.db_pool.close().await;
}

#[tokio::test]
async fn test_each_valid_submission_writes_one_order() {
  let state = seeded_state(TotalPolicy::Recompute).await;
  for n in 1..=3 {
    order_service::submit_order(&state, request(&[(5, 1), (6, n), (7, 1)], 1.0)).await.unwrap();
  }
  assert_eq!(row_counts(&state).await, (3, 9));
}
