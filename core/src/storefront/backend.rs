// kiosk-core/src/storefront/backend.rs

use crate::catalog::Menu;
use crate::checkout::{OrderReceipt, OrderRequest};
use async_trait::async_trait;
use thiserror::Error;

/// A failed backend call as the kiosk sees it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (status {status})")]
pub struct BackendError {
  pub status: u16,
  pub message: String,
  /// Request fields the server named, e.g. `payment.cvv`.
  pub fields: Vec<String>,
}

impl BackendError {
  pub fn new(status: u16, message: impl Into<String>) -> Self {
    Self {
      status,
      message: message.into(),
      fields: Vec::new(),
    }
  }

  pub fn is_client_error(&self) -> bool {
    (400..500).contains(&self.status)
  }
}

/// What the kiosk needs from the ordering service.
#[async_trait]
pub trait KioskBackend: Send + Sync {
  async fn fetch_menu(&self) -> Result<Menu, BackendError>;

  async fn submit_order(&self, order: OrderRequest) -> Result<OrderReceipt, BackendError>;
}
