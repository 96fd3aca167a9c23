// storefront_app/src/state.rs
use crate::config::AppConfig;
use crate::errors::AppError;
use sqlx::PgPool;
use std::sync::Arc;
use storefront_core::{Checkout, FlowRegistry};

#[derive(Clone)]
pub struct AppState {
  pub db_pool: PgPool,
  pub flows: Arc<FlowRegistry<AppError>>,
  pub checkout: Arc<Checkout>,
  pub config: Arc<AppConfig>,
}

/// State over a pool that never connects and an in-memory checkout backend.
/// Only requests that are settled before any query runs can use it.
#[cfg(test)]
pub(crate) fn lazy_test_state(store: storefront_core::MemoryStore) -> AppState {
  use sqlx::postgres::PgPoolOptions;
  use storefront_core::CheckoutSettings;

  let config = AppConfig::from_lookup(|name| match name {
    "DATABASE_URL" => Some("postgres://storefront@localhost:5432/storefront_test".to_string()),
    _ => None,
  })
  .unwrap();
  let db_pool = PgPoolOptions::new().connect_lazy(&config.database_url).unwrap();
  let flows = Arc::new(FlowRegistry::<AppError>::new());
  crate::flows::register_all_flows(&flows);
  AppState {
    db_pool,
    flows,
    checkout: Arc::new(Checkout::new(Arc::new(store), CheckoutSettings::default())),
    config: Arc::new(config),
  }
}
