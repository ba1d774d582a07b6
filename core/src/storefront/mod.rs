// kiosk-core/src/storefront/mod.rs

//! Kiosk presentation state: browsing, cart and checkout screens driven
//! against any [`KioskBackend`].

pub mod backend;
pub mod form;
pub mod images;
pub mod session;

pub use backend::{BackendError, KioskBackend};
pub use form::{CheckoutForm, FieldErrors};
pub use images::{category_image_candidates, item_image_candidates};
pub use session::{CheckoutFailure, KioskSession, View};
