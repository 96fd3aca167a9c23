// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Duration;
use storefront_core::{CartLine, Checkout, CheckoutSettings, ContextData, FlowError, MemoryStore, StepControl};
use tracing::Level;
use uuid::Uuid;

// --- Tracing ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Checkout fixtures ---
pub fn checkout_over(store: &MemoryStore) -> Checkout {
  Checkout::new(Arc::new(store.clone()), CheckoutSettings::default())
}

pub fn checkout_with_timeout(store: &MemoryStore, timeout: Duration) -> Checkout {
  Checkout::new(
    Arc::new(store.clone()),
    CheckoutSettings {
      attempt_timeout: timeout,
      ..CheckoutSettings::default()
    },
  )
}

pub fn line(product_id: Uuid, quantity: i32) -> CartLine {
  CartLine::new(product_id, quantity)
}

pub async fn stock_of(store: &MemoryStore, id: Uuid) -> i32 {
  store.product(id).await.map(|p| p.stock).unwrap_or(-1)
}

// --- Flow fixtures ---
#[derive(Clone, Debug, Default)]
pub struct TrailContext {
  pub trail: Vec<String>,
  pub halt_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Flow engine error: {0}")]
  Flow(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<FlowError> for TestError {
  fn from(fe: FlowError) -> Self {
    TestError::Flow(format!("{:?}", fe))
  }
}

pub fn recording_handler(
  label: &'static str,
) -> impl Fn(ContextData<TrailContext>) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<StepControl, TestError>> + Send>>
     + Send
     + Sync
     + 'static {
  move |ctx: ContextData<TrailContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.trail.push(label.to_string());
      if guard.halt_at.as_deref() == Some(label) {
        return Ok(StepControl::Halt);
      }
      Ok(StepControl::Continue)
    })
  }
}

pub fn failing_handler(
  label: &'static str,
) -> impl Fn(ContextData<TrailContext>) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<StepControl, TestError>> + Send>>
     + Send
     + Sync
     + 'static {
  move |ctx: ContextData<TrailContext>| {
    Box::pin(async move {
      ctx.write().trail.push(label.to_string());
      Err(TestError::Handler(format!("{} failed", label)))
    })
  }
}
