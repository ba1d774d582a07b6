// kiosk/src/web/json_body.rs

//! JSON request bodies decoded with the path of the offending field, so a
//! type error comes back as a 400 naming e.g. `items[0].quantity`.

use crate::errors::{AppError, Result};
use actix_web::{HttpMessage, HttpRequest};
use serde::de::DeserializeOwned;

const MISSING_FIELD_PREFIX: &str = "missing field `";

/// Parses `body` as `T`. Syntax errors, type errors and missing fields all
/// become `AppError::Validation`; the failing path goes in `fields` when one
/// can be named.
pub fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
  let mut deserializer = serde_json::Deserializer::from_slice(body);
  let value: T = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
    let field = field_path(&err.path().to_string(), &err.inner().to_string());
    AppError::Validation {
      message: format!("Invalid request body: {}", err.inner()),
      fields: field.into_iter().collect(),
    }
  })?;
  deserializer
    .end()
    .map_err(|e| AppError::validation(format!("Invalid request body: {}", e)))?;
  Ok(value)
}

/// Rejects bodies sent with a non-JSON content type. A missing header is
/// accepted.
pub fn require_json_content_type(req: &HttpRequest) -> Result<()> {
  let content_type = req.content_type();
  if content_type.is_empty() || content_type.eq_ignore_ascii_case("application/json") || content_type.ends_with("+json") {
    Ok(())
  } else {
    Err(AppError::validation(format!(
      "Invalid request body: expected application/json, got {}",
      content_type
    )))
  }
}

// serde reports a missing field at its parent, so the name is taken from the
// message and appended.
fn field_path(path: &str, message: &str) -> Option<String> {
  let parent = if path == "." { "" } else { path };
  let missing = message
    .strip_prefix(MISSING_FIELD_PREFIX)
    .and_then(|rest| rest.split('`').next());
  match (parent, missing) {
    ("", None) => None,
    ("", Some(name)) => Some(name.to_string()),
    (parent, Some(name)) => Some(format!("{}.{}", parent, name)),
    (parent, None) => Some(parent.to_string()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use kiosk_core::OrderRequest;
  use serde_json::{json, Value};

  fn order_body() -> Value {
    json!({
      "items": [{"item_id": 5, "quantity": 2}],
      "total": 19.0,
      "payment": {
        "card_number": "4111111111111111",
        "card_holder_name": "Ada Lovelace",
        "expiry_month": 12,
        "expiry_year": 2099,
        "cvv": "123"
      }
    })
  }

  fn rejected_fields(body: &Value) -> Vec<String> {
    match parse_json_body::<OrderRequest>(body.to_string().as_bytes()) {
      Err(AppError::Validation { message, fields }) => {
        assert!(message.starts_with("Invalid request body"), "{}", message);
        fields
      }
      other => panic!("expected a validation error, got {:?}", other),
    }
  }

  #[test]
  fn well_formed_body_parses() {
    let request: OrderRequest = parse_json_body(order_body().to_string().as_bytes()).unwrap();
    assert_eq!(request.items[0].quantity, 2);
  }

  #[test]
  fn type_errors_name_the_field_path() {
    let mut body = order_body();
    body["items"][0]["quantity"] = json!(1.5);
    assert_eq!(rejected_fields(&body), ["items[0].quantity"]);

    let mut body = order_body();
    body["total"] = json!("9.50");
    assert_eq!(rejected_fields(&body), ["total"]);

    let mut body = order_body();
    body["payment"]["expiry_month"] = json!("12");
    assert_eq!(rejected_fields(&body), ["payment.expiry_month"]);
  }

  #[test]
  fn missing_fields_are_named() {
    let mut body = order_body();
    body.as_object_mut().unwrap().remove("total");
    assert_eq!(rejected_fields(&body), ["total"]);

    let mut body = order_body();
    body["payment"].as_object_mut().unwrap().remove("cvv");
    assert_eq!(rejected_fields(&body), ["payment.cvv"]);
  }

  #[test]
  fn syntax_errors_name_no_field() {
    let err = parse_json_body::<OrderRequest>(b"{\"items\": [").unwrap_err();
    assert!(err.fields().is_empty());
    assert!(parse_json_body::<OrderRequest>(format!("{} trailing", order_body()).as_bytes()).is_err());
  }
}
