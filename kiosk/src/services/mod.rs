// kiosk/src/services/mod.rs

pub mod order_service;
pub mod payment_mock;
