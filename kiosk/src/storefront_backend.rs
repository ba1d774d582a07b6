// kiosk/src/storefront_backend.rs

//! In-process `KioskBackend`: lets a `KioskSession` run against the server's
//! own repositories and checkout flow without going through HTTP.

use crate::errors::AppError;
use crate::repository::menu_repo;
use crate::services::order_service;
use crate::state::AppState;
use actix_web::ResponseError;
use async_trait::async_trait;
use kiosk_core::{BackendError, KioskBackend, Menu, OrderReceipt, OrderRequest};

#[derive(Clone)]
pub struct LocalBackend {
  app_state: AppState,
}

impl LocalBackend {
  pub fn new(app_state: AppState) -> Self {
    Self { app_state }
  }
}

/// Same status, message and fields a client of the HTTP API would see.
impl From<AppError> for BackendError {
  fn from(err: AppError) -> Self {
    BackendError {
      status: err.status_code().as_u16(),
      message: err.public_message(),
      fields: err.fields().to_vec(),
    }
  }
}

#[async_trait]
impl KioskBackend for LocalBackend {
  async fn fetch_menu(&self) -> Result<Menu, BackendError> {
    Ok(menu_repo::get_menu(&self.app_state.db_pool).await?)
  }

  async fn submit_order(&self, order: OrderRequest) -> Result<OrderReceipt, BackendError> {
    Ok(order_service::submit_order(&self.app_state, order).await?)
  }
}
