// kiosk-core/src/storefront/session.rs

use super::backend::{BackendError, KioskBackend};
use super::form::{CheckoutForm, FieldErrors, FORM_FIELDS};
use crate::cart::{Cart, CartAction, CartItem};
use crate::catalog::{Item, Menu};
use crate::checkout::{OrderReceipt, OrderRequest};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

/// The screen the kiosk is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
  #[default]
  Menu,
  Cart,
  Checkout,
  Confirmation { order_id: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutFailure {
  #[error("cart is empty")]
  EmptyCart,

  #[error("checkout form has {} invalid field(s)", .0.len())]
  InvalidForm(FieldErrors),

  #[error("order was not accepted: {0}")]
  Rejected(BackendError),
}

/// One customer's visit to the kiosk: the loaded menu, the basket and the
/// current screen.
#[derive(Debug, Clone, Default)]
pub struct KioskSession {
  menu: Menu,
  category_filter: Option<i64>,
  cart: Cart,
  view: View,
  form_errors: FieldErrors,
  banner: Option<String>,
  last_order: Option<OrderReceipt>,
}

impl KioskSession {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn menu(&self) -> &Menu {
    &self.menu
  }

  pub fn cart(&self) -> &Cart {
    &self.cart
  }

  pub fn view(&self) -> View {
    self.view
  }

  pub fn category_filter(&self) -> Option<i64> {
    self.category_filter
  }

  pub fn form_errors(&self) -> &FieldErrors {
    &self.form_errors
  }

  /// Error text shown above the current screen, if any.
  pub fn banner(&self) -> Option<&str> {
    self.banner.as_deref()
  }

  pub fn last_order(&self) -> Option<&OrderReceipt> {
    self.last_order.as_ref()
  }

  pub async fn load_menu<B>(&mut self, backend: &B) -> Result<(), BackendError>
  where
    B: KioskBackend + ?Sized,
  {
    match backend.fetch_menu().await {
      Ok(menu) => {
        info!(
          categories = menu.categories.len(),
          items = menu.items.len(),
          "Kiosk menu loaded"
        );
        self.menu = menu;
        self.banner = None;
        Ok(())
      }
      Err(e) => {
        warn!(status = e.status, error = %e.message, "Kiosk menu failed to load");
        self.banner = Some(format!("Menu unavailable: {}", e.message));
        Err(e)
      }
    }
  }

  /// `None` shows every item.
  pub fn select_category(&mut self, category_id: Option<i64>) {
    self.category_filter = category_id;
  }

  pub fn visible_items(&self) -> Vec<&Item> {
    self.menu.items_in(self.category_filter)
  }

  pub fn dispatch(&mut self, action: CartAction) {
    self.cart.apply(action);
    if self.cart.is_empty() && self.view == View::Checkout {
      self.view = View::Cart;
    }
  }

  /// Adds one unit of a menu item at its current menu price. Returns `false`
  /// when the item is not on the loaded menu.
  pub fn add_to_cart(&mut self, item_id: i64) -> bool {
    let Some(item) = self.menu.item(item_id) else {
      return false;
    };
    let action = CartAction::Add(CartItem::from(item));
    self.dispatch(action);
    true
  }

  pub fn remove_from_cart(&mut self, item_id: i64) {
    self.dispatch(CartAction::Remove(item_id));
  }

  pub fn clear_cart(&mut self) {
    self.dispatch(CartAction::Clear);
  }

  /// Moves to another screen. Checkout needs a non-empty cart and the
  /// confirmation screen is only reached through [`KioskSession::checkout`].
  pub fn navigate(&mut self, view: View) -> bool {
    match view {
      View::Checkout if self.cart.is_empty() => return false,
      View::Confirmation { .. } => return false,
      _ => {}
    }
    if matches!(self.view, View::Confirmation { .. }) {
      self.last_order = None;
    }
    self.form_errors.clear();
    self.banner = None;
    self.view = view;
    true
  }

  /// Submits the cart. On success the cart is emptied and the confirmation
  /// screen shown; on failure the cart is kept and the errors are surfaced.
  pub async fn checkout<B>(
    &mut self,
    backend: &B,
    form: &CheckoutForm,
    today: NaiveDate,
  ) -> Result<OrderReceipt, CheckoutFailure>
  where
    B: KioskBackend + ?Sized,
  {
    self.form_errors.clear();
    self.banner = None;

    if self.cart.is_empty() {
      return Err(CheckoutFailure::EmptyCart);
    }

    let payment = match form.to_payment(today) {
      Ok(payment) => payment,
      Err(errors) => {
        self.form_errors = errors.clone();
        return Err(CheckoutFailure::InvalidForm(errors));
      }
    };

    let request = OrderRequest {
      items: self.cart.line_items(),
      total: self.cart.total.as_dollars(),
      payment,
    };

    match backend.submit_order(request).await {
      Ok(receipt) => {
        info!(order_id = receipt.id, total = %receipt.total, "Kiosk order confirmed");
        self.cart.apply(CartAction::Clear);
        self.view = View::Confirmation { order_id: receipt.id };
        self.last_order = Some(receipt.clone());
        Ok(receipt)
      }
      Err(e) => {
        warn!(status = e.status, error = %e.message, "Kiosk order rejected");
        for field in &e.fields {
          let name = field.strip_prefix("payment.").unwrap_or(field);
          if let Some(known) = FORM_FIELDS.iter().find(|f| **f == name) {
            self.form_errors.insert(*known, e.message.clone());
          }
        }
        self.banner = Some(e.message.clone());
        Err(CheckoutFailure::Rejected(e))
      }
    }
  }
}
