// storefront_app/src/main.rs

mod config;
mod db;
mod errors;
mod flows;
mod models;
mod services;
mod state;
mod web;

use crate::config::{AppConfig, LogFormat};
use crate::db::PgCheckoutStore;
use crate::errors::AppError;
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::sync::Arc;
use storefront_core::{Checkout, CheckoutSettings, FlowRegistry};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  let builder = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration

  match format {
    LogFormat::Json => builder.json().init(),
    LogFormat::Text => builder.init(),
  }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
  // Config is read first so the log format is known; its error is logged right after.
  let loaded_config = AppConfig::from_env();
  init_tracing(loaded_config.as_ref().map(|c| c.log_format).unwrap_or(LogFormat::Text));

  tracing::info!("Starting storefront server...");

  let app_config = match loaded_config {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(io::Error::other(e.to_string()));
    }
  };

  let db_pool = match PgPoolOptions::new()
    .max_connections(app_config.database_max_connections)
    .connect(&app_config.database_url)
    .await
  {
    Ok(pool) => {
      tracing::info!(max_connections = app_config.database_max_connections, "Connected to the database.");
      pool
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      return Err(io::Error::other(e.to_string()));
    }
  };

  if app_config.run_migrations {
    if let Err(e) = sqlx::migrate!("./migrations").run(&db_pool).await {
      tracing::error!(error = %e, "Database migrations failed.");
      return Err(io::Error::other(e.to_string()));
    }
    tracing::info!("Database migrations applied.");
  }

  let checkout = Arc::new(Checkout::new(
    Arc::new(PgCheckoutStore::new(db_pool.clone())),
    CheckoutSettings {
      attempt_timeout: app_config.checkout_timeout,
      ..CheckoutSettings::default()
    },
  ));
  tracing::info!(
    attempt_timeout_ms = checkout.settings().attempt_timeout.as_millis() as u64,
    conflict_retries = checkout.settings().conflict_retries,
    "Checkout service configured."
  );

  let flows = Arc::new(FlowRegistry::<AppError>::new());
  flows::register_all_flows(&flows);

  let app_state = AppState {
    db_pool,
    flows,
    checkout,
    config: app_config.clone(),
  };

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Binding server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
