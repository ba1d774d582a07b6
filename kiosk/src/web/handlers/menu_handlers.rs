// kiosk/src/web/handlers/menu_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, instrument};

use crate::errors::AppError;
use crate::repository::menu_repo;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct ListItemsQuery {
  pub category_id: Option<i64>,
}

#[instrument(name = "handler::root")]
pub async fn root_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({
      "message": "Kiosk ordering API",
      "version": env!("CARGO_PKG_VERSION"),
  }))
}

#[instrument(name = "handler::health", skip(app_state))]
pub async fn health_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  sqlx::query("SELECT 1").execute(&app_state.db_pool).await.map_err(|e| {
    error!("Health check could not reach the database: {}", e);
    AppError::Sqlx(e)
  })?;
  Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}

#[instrument(name = "handler::get_menu", skip(app_state))]
pub async fn get_menu_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let menu = menu_repo::get_menu(&app_state.db_pool).await?;
  Ok(HttpResponse::Ok().json(menu))
}

#[instrument(name = "handler::list_categories", skip(app_state))]
pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = menu_repo::list_categories(&app_state.db_pool).await?;
  info!("Fetched {} categories.", categories.len());
  Ok(HttpResponse::Ok().json(categories))
}

#[instrument(name = "handler::list_items", skip(app_state, query), fields(category_id = ?query.category_id))]
pub async fn list_items_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListItemsQuery>,
) -> Result<HttpResponse, AppError> {
  let items = menu_repo::list_items(&app_state.db_pool, query.category_id).await?;
  info!("Fetched {} items.", items.len());
  Ok(HttpResponse::Ok().json(items))
}

#[instrument(name = "handler::get_item", skip(app_state, path), fields(item_id = %path.as_ref()))]
pub async fn get_item_handler(app_state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse, AppError> {
  let item = menu_repo::get_item(&app_state.db_pool, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(item))
}
