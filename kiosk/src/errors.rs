// kiosk/src/errors.rs

use actix_web::error::{PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use kiosk_core::{FlowError, OrderRejection};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {message}")]
  Validation { message: String, fields: Vec<String> },

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Seed Data Error: {0}")]
  Seed(String),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),

  // A checkout flow handler stopped the run before the order was stored.
  #[error("Checkout was halted before the order was stored.")]
  FlowHalted,
}

impl AppError {
  pub fn validation(message: impl Into<String>) -> Self {
    AppError::Validation {
      message: message.into(),
      fields: Vec::new(),
    }
  }

  /// The message put in the response body. Storage and engine failures are
  /// not described to the client.
  pub fn public_message(&self) -> String {
    match self {
      AppError::Validation { message, .. } => message.clone(),
      AppError::NotFound(m) | AppError::Conflict(m) => m.clone(),
      AppError::Sqlx(_) => "Database operation failed".to_string(),
      AppError::Config(_) | AppError::Seed(_) | AppError::Workflow { .. } | AppError::Internal(_) | AppError::FlowHalted => {
        "An internal error occurred".to_string()
      }
    }
  }

  pub fn fields(&self) -> &[String] {
    match self {
      AppError::Validation { fields, .. } => fields,
      _ => &[],
    }
  }
}

impl From<OrderRejection> for AppError {
  fn from(rejection: OrderRejection) -> Self {
    match rejection {
      OrderRejection::UnknownItem(_) => AppError::NotFound(rejection.to_string()),
      OrderRejection::TotalMismatch { .. } => AppError::Conflict(rejection.to_string()),
      OrderRejection::NoLineItems
      | OrderRejection::InvalidQuantity { .. }
      | OrderRejection::InvalidTotal
      | OrderRejection::InvalidPayment(_) => AppError::Validation {
        fields: rejection.fields(),
        message: rejection.to_string(),
      },
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation { .. } => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Conflict(_) => StatusCode::CONFLICT,
      AppError::Config(_)
      | AppError::Sqlx(_)
      | AppError::Seed(_)
      | AppError::Workflow { .. }
      | AppError::Internal(_)
      | AppError::FlowHalted => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Rejecting request");
    }

    let mut body = json!({ "error": self.public_message() });
    if !self.fields().is_empty() {
      body["fields"] = json!(self.fields());
    }
    HttpResponse::build(status).json(body)
  }
}

// --- Extractor error handlers ---

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::validation(format!("Invalid query string: {}", err)).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
  AppError::validation(format!("Invalid path parameter: {}", err)).into()
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use kiosk_core::{Cents, PaymentFieldError};

  #[test]
  fn order_rejections_map_to_statuses() {
    let cases = [
      (OrderRejection::NoLineItems, StatusCode::BAD_REQUEST),
      (OrderRejection::UnknownItem(9), StatusCode::NOT_FOUND),
      (
        OrderRejection::InvalidQuantity { index: 0, item_id: 1, quantity: 0 },
        StatusCode::BAD_REQUEST,
      ),
      (OrderRejection::InvalidTotal, StatusCode::BAD_REQUEST),
      (
        OrderRejection::TotalMismatch { expected: Cents(100), declared: Cents(200) },
        StatusCode::CONFLICT,
      ),
    ];
    for (rejection, status) in cases {
      assert_eq!(AppError::from(rejection).status_code(), status);
    }
  }

  #[test]
  fn payment_rejection_names_fields() {
    let rejection = OrderRejection::InvalidPayment(vec![PaymentFieldError {
      field: "cvv",
      message: "cvv must be 3 or 4 digits".into(),
    }]);
    let err = AppError::from(rejection);
    assert_eq!(err.fields(), ["payment.cvv".to_string()]);
  }

  #[test]
  fn storage_errors_are_not_described() {
    let err = AppError::from(sqlx::Error::RowNotFound);
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.public_message(), "Database operation failed");
  }
}
