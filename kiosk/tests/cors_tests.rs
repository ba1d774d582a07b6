// tests/cors_tests.rs
mod common;

use actix_web::http::header;
use actix_web::{test, web, App};
use common::*;
use kiosk_core::TotalPolicy;
use kiosk_server::web::{configure_app_routes, kiosk_cors};

macro_rules! cors_app {
  ($state:expr) => {
    test::init_service(
      App::new()
        .app_data(web::Data::new($state.clone()))
        .wrap(kiosk_cors(&$state.config))
        .configure(configure_app_routes),
    )
    .await
  };
}

macro_rules! preflight {
  ($uri:expr, $origin:expr) => {
    test::TestRequest::default()
      .method(actix_web::http::Method::OPTIONS)
      .uri($uri)
      .insert_header((header::ORIGIN, $origin))
      .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
      .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
      .to_request()
  };
}

#[actix_web::test]
async fn test_preflight_from_kiosk_origin_is_allowed() {
  let state = seeded_state(TotalPolicy::Enforce).await;
  let app = cors_app!(state);

  for uri in ["/orders", "/api/v1/orders"] {
    let resp = test::call_service(&app, preflight!(uri, "http://localhost:3000")).await;
    assert!(resp.status().is_success(), "{}: {}", uri, resp.status());
    assert_eq!(
      resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
      "http://localhost:3000"
    );
    let methods = resp
      .headers()
      .get(header::ACCESS_CONTROL_ALLOW_METHODS)
      .unwrap()
      .to_str()
      .unwrap()
      .to_string();
    assert!(methods.contains("POST"), "{}", methods);
  }
}

#[actix_web::test]
async fn test_simple_request_echoes_allowed_origin() {
  let state = seeded_state(TotalPolicy::Enforce).await;
  let app = cors_app!(state);

  let req = test::TestRequest::get()
    .uri("/menu")
    .insert_header((header::ORIGIN, "http://127.0.0.1:3000"))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert!(resp.status().is_success());
  assert_eq!(
    resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
    "http://127.0.0.1:3000"
  );
}

#[actix_web::test]
async fn test_unlisted_origin_gets_no_allow_origin() {
  let state = seeded_state(TotalPolicy::Enforce).await;
  let app = cors_app!(state);

  let resp = test::call_service(&app, preflight!("/orders", "http://evil.example.com")).await;
  assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());

  let req = test::TestRequest::get()
    .uri("/menu")
    .insert_header((header::ORIGIN, "http://evil.example.com"))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
