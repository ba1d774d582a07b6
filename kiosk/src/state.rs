// kiosk/src/state.rs
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::pipelines;
use kiosk_core::FlowRegistry;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: SqlitePool,
  pub flow_registry: Arc<FlowRegistry<AppError>>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Wraps the pool and config and registers every application flow.
  pub fn new(db_pool: SqlitePool, config: Arc<AppConfig>) -> Self {
    let flow_registry = Arc::new(FlowRegistry::<AppError>::new());
    pipelines::register_all_pipelines(&flow_registry);
    Self {
      db_pool,
      flow_registry,
      config,
    }
  }
}
