// kiosk/src/pipelines/mod.rs

//! Defines and registers the flows the server runs on `kiosk_core::FlowRegistry`.

use crate::errors::AppError;
use kiosk_core::FlowRegistry;

pub mod checkout_pipeline;
pub mod contexts;

/// Called once per `AppState`.
pub fn register_all_pipelines(flow_registry: &FlowRegistry<AppError>) {
  tracing::info!("Registering application flows...");
  checkout_pipeline::register_checkout_pipeline(flow_registry);
}
