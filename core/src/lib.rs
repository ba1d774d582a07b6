// kiosk-core/src/lib.rs

//! Kiosk core: the menu catalog, cart reducer, order rules and payment
//! snapshot shared by the ordering server and the kiosk front end, plus the
//! async step-flow engine the server runs checkout on.
//!
//! Typical server use:
//!  1. Build a [`Flow`] for a context type, naming its steps in order.
//!  2. Attach async handlers with `.on(..)`, `.before(..)` or `.after(..)`.
//!  3. Register the flow in a [`FlowRegistry`] and call `registry.run(ctx)`.
//!
//! The front end drives a [`KioskSession`] against any [`KioskBackend`].

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod flow;
pub mod money;
pub mod payment;
pub mod storefront;

pub use crate::cart::{reduce, Cart, CartAction, CartEntry, CartItem};
pub use crate::catalog::{Category, CatalogRejection, Item, Menu, NewCategory, NewItem};
pub use crate::checkout::{
  validate_order, LineItem, OrderDetail, OrderLine, OrderReceipt, OrderRejection, OrderRequest, TotalPolicy,
};
pub use crate::error::{FlowError, FlowResult};
pub use crate::flow::{ContextData, Flow, FlowControl, FlowOutcome, FlowRegistry, StepDef};
pub use crate::money::Cents;
pub use crate::payment::{BillingAddress, MaskedPayment, PaymentFieldError, PaymentSnapshot};
pub use crate::storefront::{BackendError, CheckoutForm, KioskBackend, KioskSession, View};
