// tests/menu_api_tests.rs
mod common;

use actix_web::{http::StatusCode, test, web, App};
use common::*;
use kiosk_core::TotalPolicy;
use kiosk_server::web::configure_app_routes;
use serde_json::Value;

macro_rules! test_app {
  ($state:expr) => {
    test::init_service(
      App::new()
        .app_data(web::Data::new($state.clone()))
        .configure(configure_app_routes),
    )
    .await
  };
}

#[actix_web::test]
async fn test_root_and_health() {
  let state = seeded_state(TotalPolicy::Enforce).await;
  let app = test_app!(state);

  let root: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/").to_request()).await;
  assert_eq!(root["version"], env!("CARGO_PKG_VERSION"));

  for uri in ["/health", "/api/v1/health"] {
    let health: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(health["status"], "ok");
  }
}

#[actix_web::test]
async fn test_menu_is_served_at_root_and_prefix() {
  let state = seeded_state(TotalPolicy::Enforce).await;
  let app = test_app!(state);

  for uri in ["/menu", "/api/v1/menu"] {
    let menu: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(menu["categories"].as_array().unwrap().len(), 2);
    assert_eq!(menu["items"].as_array().unwrap().len(), 3);
    assert_eq!(menu["items"][0]["name"], "Burger");
    assert_eq!(menu["items"][0]["price"], 9.5);
    assert_eq!(menu["categories"][0]["image"], "mains.jpg");
    assert!(menu["categories"][1].get("image").is_none());
  }
}

#[actix_web::test]
async fn test_categories_ordered_by_id() {
  let state = seeded_state(TotalPolicy::Enforce).await;
  let app = test_app!(state);

  let categories: Value =
    test::call_and_read_body_json(&app, test::TestRequest::get().uri("/categories").to_request()).await;
  let names: Vec<_> = categories.as_array().unwrap().iter().map(|c| c["name"].clone()).collect();
  assert_eq!(names, vec!["Mains", "Drinks"]);
}

#[actix_web::test]
async fn test_items_filter() {
  let state = seeded_state(TotalPolicy::Enforce).await;
  let app = test_app!(state);

  let all: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/items").to_request()).await;
  assert_eq!(all.as_array().unwrap().len(), 3);

  let drinks: Value =
    test::call_and_read_body_json(&app, test::TestRequest::get().uri("/items?category_id=2").to_request()).await;
  assert_eq!(drinks.as_array().unwrap().len(), 1);
  assert_eq!(drinks[0]["id"], 7);

  let unknown: Value = test::call_and_read_body_json(
    &app,
    test::TestRequest::get().uri("/api/v1/items?category_id=99").to_request(),
  )
  .await;
  assert!(unknown.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_single_item_and_not_found() {
  let state = seeded_state(TotalPolicy::Enforce).await;
  let app = test_app!(state);

  let item: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/items/5").to_request()).await;
  assert_eq!(item["name"], "Burger");
  assert_eq!(item["category_id"], 1);
  assert_eq!(item["image_id"], "burger");

  let resp = test::call_service(&app, test::TestRequest::get().uri("/items/404").to_request()).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["error"].as_str().unwrap().contains("404"));
}

#[actix_web::test]
async fn test_bad_parameters_are_validation_errors() {
  let state = seeded_state(TotalPolicy::Enforce).await;
  let app = test_app!(state);

  for uri in ["/items/burger", "/items?category_id=mains"] {
    let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
  }
}
