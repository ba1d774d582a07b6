// kiosk/src/web/mod.rs

pub mod cors;
pub mod handlers;
pub mod json_body;
pub mod routes;

pub use cors::kiosk_cors;
pub use routes::configure_app_routes;
