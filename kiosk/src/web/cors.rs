// kiosk/src/web/cors.rs

use crate::config::AppConfig;
use actix_cors::Cors;
use actix_web::http::header;

/// CORS for the browser kiosk. Only the configured origins get
/// `Access-Control-Allow-Origin`; preflights are cached for an hour.
pub fn kiosk_cors(config: &AppConfig) -> Cors {
  config
    .allowed_origins
    .iter()
    .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    .allowed_methods(["GET", "POST", "OPTIONS"])
    .allowed_headers([header::CONTENT_TYPE, header::ACCEPT])
    .max_age(60 * 60)
}
