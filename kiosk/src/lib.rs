// kiosk/src/lib.rs

//! Kiosk ordering server: menu reads and order submission over actix-web and
//! an sqlx SQLite pool.

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod repository;
pub mod seed;
pub mod services;
pub mod state;
pub mod storefront_backend;
pub mod web;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::state::AppState;
use std::sync::Arc;

/// Connects, bootstraps the schema, seeds if configured and wires up the
/// flows. Everything `main` needs before binding the server.
pub async fn build_app_state(config: Arc<AppConfig>) -> Result<AppState> {
  let db_pool = db::connect(&config).await?;
  db::bootstrap_schema(&db_pool).await?;

  if config.seed_db {
    let outcome = seed::seed_from_file(&db_pool, &config.seed_file).await?;
    tracing::info!(?outcome, "Seed step finished.");
  }

  Ok(AppState::new(db_pool, config))
}
