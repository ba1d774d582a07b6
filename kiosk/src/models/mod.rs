// kiosk/src/models/mod.rs

//! Row types for the catalog and order tables.

pub mod category;
pub mod item;
pub mod order;
pub mod order_item;

pub use category::CategoryRecord;
pub use item::ItemRecord;
pub use order::OrderRecord;
pub use order_item::OrderItemRecord;
