// storefront_app/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Text,
  Json,
}

impl FromStr for LogFormat {
  type Err = String;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "text" => Ok(LogFormat::Text),
      "json" => Ok(LogFormat::Json),
      other => Err(format!("expected 'text' or 'json', got '{}'", other)),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub database_max_connections: u32,
  pub checkout_timeout: Duration,
  pub session_ttl_hours: i64,
  pub low_stock_threshold: i32,
  pub run_migrations: bool,
  pub log_format: LogFormat,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the configuration from any variable source.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_env = |var_name: &str| {
      lookup(var_name).ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", var_name)))
    };
    let or_default = |var_name: &str, default: &str| lookup(var_name).unwrap_or_else(|| default.to_string());

    let server_host = or_default("SERVER_HOST", "127.0.0.1");
    let server_port = parse_var::<u16>("SERVER_PORT", or_default("SERVER_PORT", "8080"))?;
    let database_url = get_env("DATABASE_URL")?;
    let database_max_connections =
      parse_var::<u32>("DATABASE_MAX_CONNECTIONS", or_default("DATABASE_MAX_CONNECTIONS", "10"))?;
    let checkout_timeout_ms = parse_var::<u64>("CHECKOUT_TIMEOUT_MS", or_default("CHECKOUT_TIMEOUT_MS", "5000"))?;
    let session_ttl_hours = parse_var::<i64>("SESSION_TTL_HOURS", or_default("SESSION_TTL_HOURS", "24"))?;
    let low_stock_threshold = parse_var::<i32>("LOW_STOCK_THRESHOLD", or_default("LOW_STOCK_THRESHOLD", "5"))?;
    let run_migrations = parse_var::<bool>("RUN_MIGRATIONS", or_default("RUN_MIGRATIONS", "true"))?;
    let log_format = parse_var::<LogFormat>("LOG_FORMAT", or_default("LOG_FORMAT", "text"))?;

    if database_max_connections == 0 {
      return Err(AppError::Config("DATABASE_MAX_CONNECTIONS must be at least 1".to_string()));
    }
    if checkout_timeout_ms == 0 {
      return Err(AppError::Config("CHECKOUT_TIMEOUT_MS must be greater than 0".to_string()));
    }
    if session_ttl_hours <= 0 {
      return Err(AppError::Config("SESSION_TTL_HOURS must be greater than 0".to_string()));
    }

    Ok(Self {
      server_host,
      server_port,
      database_url,
      database_max_connections,
      checkout_timeout: Duration::from_millis(checkout_timeout_ms),
      session_ttl_hours,
      low_stock_threshold,
      run_migrations,
      log_format,
    })
  }
}

fn parse_var<T>(var_name: &str, raw: String) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  raw
    .trim()
    .parse::<T>()
    .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", var_name, raw, e)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig> {
    let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    AppConfig::from_lookup(|name| map.get(name).cloned())
  }

  #[test]
  fn defaults_apply_when_only_database_url_is_set() {
    let cfg = config_from(&[("DATABASE_URL", "postgres://localhost/storefront")]).unwrap();
    assert_eq!(cfg.server_host, "127.0.0.1");
    assert_eq!(cfg.server_port, 8080);
    assert_eq!(cfg.database_max_connections, 10);
    assert_eq!(cfg.checkout_timeout, Duration::from_millis(5000));
    assert_eq!(cfg.session_ttl_hours, 24);
    assert_eq!(cfg.low_stock_threshold, 5);
    assert!(cfg.run_migrations);
    assert_eq!(cfg.log_format, LogFormat::Text);
  }

  #[test]
  fn missing_database_url_is_a_config_error() {
    match config_from(&[]) {
      Err(AppError::Config(msg)) => assert!(msg.contains("DATABASE_URL")),
      other => panic!("Expected config error, got {:?}", other),
    }
  }

  #[test]
  fn overrides_are_parsed() {
    let cfg = config_from(&[
      ("DATABASE_URL", "postgres://db/shop"),
      ("SERVER_PORT", "9090"),
      ("CHECKOUT_TIMEOUT_MS", "250"),
      ("RUN_MIGRATIONS", "false"),
      ("LOG_FORMAT", "JSON"),
    ])
    .unwrap();
    assert_eq!(cfg.server_port, 9090);
    assert_eq!(cfg.checkout_timeout, Duration::from_millis(250));
    assert!(!cfg.run_migrations);
    assert_eq!(cfg.log_format, LogFormat::Json);
  }

  #[test]
  fn invalid_values_are_rejected() {
    for (name, value) in [
      ("SERVER_PORT", "eighty"),
      ("CHECKOUT_TIMEOUT_MS", "0"),
      ("LOG_FORMAT", "yaml"),
      ("DATABASE_MAX_CONNECTIONS", "0"),
      ("SESSION_TTL_HOURS", "-1"),
    ] {
      let result = config_from(&[("DATABASE_URL", "postgres://db/shop"), (name, value)]);
      assert!(matches!(result, Err(AppError::Config(_))), "{}={} should be rejected", name, value);
    }
  }
}
