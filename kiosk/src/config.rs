// kiosk/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use kiosk_core::TotalPolicy;
use std::env;
use std::path::PathBuf;

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
  #[default]
  Pretty,
  Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub db_max_connections: u32,

  // How a client-declared order total is checked.
  pub total_policy: TotalPolicy,

  // Catalog seeding on startup
  pub seed_db: bool,
  pub seed_file: PathBuf,

  pub log_format: LogFormat,

  // Browser origins allowed to call the API.
  pub allowed_origins: Vec<String>,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|var_name| env::var(var_name).ok())
  }

  /// Builds the config from any variable source. Unset variables fall back to
  /// their defaults; set but malformed ones are errors.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get_env = |var_name: &str, default: &str| lookup(var_name).unwrap_or_else(|| default.to_string());

    let server_host = get_env("SERVER_HOST", "127.0.0.1");
    let server_port = get_env("SERVER_PORT", "8080")
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL", "sqlite://kiosk.db");
    let db_max_connections = get_env("DB_MAX_CONNECTIONS", "5")
      .parse::<u32>()
      .ok()
      .filter(|n| *n > 0)
      .ok_or_else(|| AppError::Config("DB_MAX_CONNECTIONS must be a positive integer".to_string()))?;

    let total_policy = get_env("ORDER_TOTAL_POLICY", "enforce")
      .parse::<TotalPolicy>()
      .map_err(|e| AppError::Config(format!("Invalid ORDER_TOTAL_POLICY: {}", e)))?;

    let seed_db = get_env("SEED_DB", "false")
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;
    let seed_file = PathBuf::from(get_env("SEED_FILE", "seed_data.json"));

    let log_format = match get_env("LOG_FORMAT", "pretty").to_ascii_lowercase().as_str() {
      "pretty" => LogFormat::Pretty,
      "json" => LogFormat::Json,
      other => {
        return Err(AppError::Config(format!(
          "Invalid LOG_FORMAT '{}', expected pretty or json",
          other
        )))
      }
    };

    let allowed_origins: Vec<String> = get_env("ALLOWED_ORIGINS", DEFAULT_ALLOWED_ORIGINS)
      .split(',')
      .map(str::trim)
      .filter(|origin| !origin.is_empty())
      .map(str::to_string)
      .collect();
    if let Some(bad) = allowed_origins
      .iter()
      .find(|o| !(o.starts_with("http://") || o.starts_with("https://")))
    {
      return Err(AppError::Config(format!(
        "Invalid ALLOWED_ORIGINS entry '{}', expected an http(s) origin",
        bad
      )));
    }

    Ok(Self {
      server_host,
      server_port,
      database_url,
      db_max_connections,
      total_policy,
      seed_db,
      seed_file,
      log_format,
      allowed_origins,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
