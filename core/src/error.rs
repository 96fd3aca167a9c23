// storefront_core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;
use uuid::Uuid;

/// Failures of the checkout transaction, as seen by callers of
/// [`Checkout::place_order`](crate::checkout::Checkout::place_order).
///
/// Every variant is an all-or-nothing outcome: when one is returned, no stock
/// was decremented and no order was written.
#[derive(Debug, Error)]
pub enum CheckoutError {
  #[error("Checkout requires an authenticated caller")]
  Unauthorized,

  #[error("Cart contains no items")]
  EmptyCart,

  #[error("Invalid quantity {quantity} for product {product_id}")]
  InvalidQuantity { product_id: Uuid, quantity: i64 },

  #[error("Product not found: {product_id}")]
  ProductNotFound { product_id: Uuid },

  #[error("Insufficient stock for '{name}' ({product_id}): requested {requested}, available {available}")]
  InsufficientStock {
    product_id: Uuid,
    name: String,
    available: i32,
    requested: i32,
  },

  #[error("Order total exceeds the representable range")]
  TotalOverflow,

  #[error("Checkout transaction conflicted with a concurrent write; retry later")]
  TransactionConflict,

  #[error("Checkout transaction did not finish within {timeout_ms}ms")]
  Timeout { timeout_ms: u64 },

  #[error("Storage failure during checkout. Source: {source}")]
  Storage {
    #[source]
    source: AnyhowError,
  },
}

impl CheckoutError {
  /// True for failures a client may retry unchanged.
  pub fn is_transient(&self) -> bool {
    matches!(self, CheckoutError::TransactionConflict | CheckoutError::Timeout { .. })
  }
}

/// Errors raised by a storage backend behind the checkout ports.
#[derive(Debug, Error)]
pub enum StoreError {
  /// Serialization failure, deadlock victim or similar. The whole
  /// transaction has been (or will be) rolled back and may be retried.
  #[error("Storage transaction conflict")]
  Conflict,

  #[error("Storage backend error: {0}")]
  Backend(#[source] AnyhowError),
}

impl From<AnyhowError> for StoreError {
  fn from(err: AnyhowError) -> Self {
    StoreError::Backend(err)
  }
}

/// Errors produced by the flow engine itself, as opposed to errors raised by
/// step handlers.
#[derive(Debug, Error)]
pub enum FlowError {
  #[error("Handler missing for required step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("No flow registered for context type {type_name}")]
  NotRegistered { type_name: String },

  #[error("Context type mismatch for flow over {expected_type}")]
  TypeMismatch { expected_type: String },

  #[error("Internal flow error: {0}")]
  Internal(String),
}

pub type CheckoutResult<T, E = CheckoutError> = std::result::Result<T, E>;
