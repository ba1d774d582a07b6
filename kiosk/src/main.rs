// kiosk/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use kiosk_server::config::{AppConfig, LogFormat};
use kiosk_server::web::{configure_app_routes, kiosk_cors};
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  // RUST_LOG overrides the default level.
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE);
  match format {
    LogFormat::Pretty => builder.init(),
    LogFormat::Json => builder.json().init(),
  }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  let loaded_config = AppConfig::from_env();
  init_tracing(loaded_config.as_ref().map(|c| c.log_format).unwrap_or_default());

  tracing::info!("Starting kiosk ordering server...");

  let app_config = match loaded_config {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };
  tracing::info!(total_policy = %app_config.total_policy, "Application configuration loaded.");

  let app_state = match kiosk_server::build_app_state(app_config.clone()).await {
    Ok(state) => state,
    Err(e) => {
      tracing::error!(error = %e, "Failed to initialise application state.");
      return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    }
  };

  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  tracing::info!(origins = ?app_config.allowed_origins, "CORS origins configured.");

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(kiosk_cors(&app_state.config))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
