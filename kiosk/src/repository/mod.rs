// kiosk/src/repository/mod.rs

//! SQL access for the menu store and the order repository.

pub mod menu_repo;
pub mod order_repo;
