// kiosk/src/web/routes.rs

use crate::errors::{path_error_handler, query_error_handler};
use crate::web::handlers::{menu_handlers, order_handlers};
use actix_web::web;

/// Serves every route at the root and again under `/api/v1`.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::QueryConfig::default().error_handler(query_error_handler))
    .app_data(web::PathConfig::default().error_handler(path_error_handler))
    .service(web::scope("/api/v1").configure(kiosk_routes))
    .configure(kiosk_routes);
}

fn kiosk_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/", web::get().to(menu_handlers::root_handler))
    .route("/health", web::get().to(menu_handlers::health_handler))
    .route("/menu", web::get().to(menu_handlers::get_menu_handler))
    .route("/categories", web::get().to(menu_handlers::list_categories_handler))
    .service(
      web::scope("/items")
        .route("", web::get().to(menu_handlers::list_items_handler))
        .route("/{item_id}", web::get().to(menu_handlers::get_item_handler)),
    )
    .service(
      web::scope("/orders")
        .route("", web::post().to(order_handlers::create_order_handler))
        .route("/{order_id}", web::get().to(order_handlers::get_order_handler)),
    );
}
