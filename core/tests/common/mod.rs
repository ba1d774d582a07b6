// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use kiosk_core::{
  BackendError, Category, Cents, ContextData, FlowControl, FlowError, Item, KioskBackend, Menu, OrderReceipt,
  OrderRequest,
};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::Level;

// --- Flow test context ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Flow engine error: {0}")]
  Flow(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<FlowError> for TestError {
  fn from(fe: FlowError) -> Self {
    TestError::Flow(format!("{:?}", fe))
  }
}

pub async fn record_step(
  ctx: ContextData<TestContext>,
  step_name: &'static str,
  message: &'static str,
) -> Result<FlowControl, TestError> {
  let mut guard = ctx.write();
  guard.counter += 1;
  guard.message.push_str(message);
  guard.steps_executed.push(step_name.to_string());
  if guard.should_stop_at.as_deref() == Some(step_name) {
    return Ok(FlowControl::Stop);
  }
  Ok(FlowControl::Continue)
}

pub async fn fail_step(ctx: ContextData<TestContext>, step_name: &'static str) -> Result<FlowControl, TestError> {
  ctx.write().steps_executed.push(step_name.to_string());
  Err(TestError::Handler(format!("{} failed", step_name)))
}

// --- Tracing ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Catalog fixtures ---
pub fn today() -> NaiveDate {
  NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

pub fn sample_menu() -> Menu {
  Menu {
    categories: vec![
      Category { id: 1, name: "Mains".into(), image: Some("mains.jpg".into()) },
      Category { id: 2, name: "Drinks".into(), image: None },
    ],
    items: vec![
      Item {
        id: 5,
        category_id: 1,
        name: "Burger".into(),
        price: Cents(950),
        description: Some("Beef patty".into()),
        image_id: Some("burger".into()),
      },
      Item {
        id: 6,
        category_id: 1,
        name: "Fries".into(),
        price: Cents(300),
        description: None,
        image_id: None,
      },
      Item {
        id: 7,
        category_id: 2,
        name: "Cola".into(),
        price: Cents(199),
        description: None,
        image_id: None,
      },
    ],
  }
}

/// In-memory backend: serves a fixed menu and answers orders from a queue of
/// canned results, recording every request it receives.
pub struct FakeBackend {
  pub menu: Result<Menu, BackendError>,
  pub next_order_id: Mutex<i64>,
  pub reject_with: Mutex<Option<BackendError>>,
  pub received: Mutex<Vec<OrderRequest>>,
}

impl FakeBackend {
  pub fn new(menu: Menu) -> Self {
    Self {
      menu: Ok(menu),
      next_order_id: Mutex::new(1),
      reject_with: Mutex::new(None),
      received: Mutex::new(Vec::new()),
    }
  }

  pub fn failing_menu(error: BackendError) -> Self {
    let mut backend = Self::new(Menu::default());
    backend.menu = Err(error);
    backend
  }

  pub fn reject_next(&self, error: BackendError) {
    *self.reject_with.lock() = Some(error);
  }
}

#[async_trait]
impl KioskBackend for FakeBackend {
  async fn fetch_menu(&self) -> Result<Menu, BackendError> {
    self.menu.clone()
  }

  async fn submit_order(&self, order: OrderRequest) -> Result<OrderReceipt, BackendError> {
    let total = Cents::from_dollars(order.total).unwrap_or_default();
    self.received.lock().push(order);
    if let Some(error) = self.reject_with.lock().take() {
      return Err(error);
    }
    let mut next = self.next_order_id.lock();
    let id = *next;
    *next += 1;
    Ok(OrderReceipt {
      id,
      timestamp: Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap(),
      total,
    })
  }
}
