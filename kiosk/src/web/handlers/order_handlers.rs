// kiosk/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use kiosk_core::OrderRequest;
use tracing::{field, info, instrument, Span};

use crate::errors::AppError;
use crate::services::order_service;
use crate::state::AppState;
use crate::web::json_body::{parse_json_body, require_json_content_type};

#[instrument(
    name = "handler::create_order",
    skip(app_state, req, body),
    fields(lines = field::Empty)
)]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  body: web::Bytes,
) -> Result<HttpResponse, AppError> {
  require_json_content_type(&req)?;
  let order_request: OrderRequest = parse_json_body(&body)?;
  Span::current().record("lines", order_request.items.len());

  info!("Order submission received.");
  let receipt = order_service::submit_order(app_state.get_ref(), order_request).await?;
  Ok(HttpResponse::Created().json(receipt))
}

#[instrument(name = "handler::get_order", skip(app_state, path), fields(order_id = %path.as_ref()))]
pub async fn get_order_handler(app_state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse, AppError> {
  let order = order_service::fetch_order(app_state.get_ref(), path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(order))
}
