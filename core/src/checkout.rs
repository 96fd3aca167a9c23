// storefront_core/src/checkout.rs

//! The checkout transaction: turns a cart into an order while keeping stock
//! non-negative under concurrent checkouts.
//!
//! Prices and stock are always re-read inside the transaction. Stock is
//! lowered with the store's conditional decrement, never by writing back a
//! value computed in memory, so two checkouts racing for the last unit cannot
//! both succeed.

use crate::domain::{Cart, CartLine, NewOrder, NewOrderItem, OrderReceipt, OrderStatus, ProductSnapshot};
use crate::error::{CheckoutError, CheckoutResult, StoreError};
use crate::store::{CheckoutStore, CheckoutTx};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

impl From<StoreError> for CheckoutError {
  fn from(err: StoreError) -> Self {
    match err {
      StoreError::Conflict => CheckoutError::TransactionConflict,
      StoreError::Backend(source) => CheckoutError::Storage { source },
    }
  }
}

#[derive(Debug, Clone)]
pub struct CheckoutSettings {
  /// Deadline for a single transaction attempt, commit included.
  pub attempt_timeout: Duration,
  /// How many times a conflicted attempt is re-run with a fresh transaction.
  pub conflict_retries: u32,
}

impl Default for CheckoutSettings {
  fn default() -> Self {
    Self {
      attempt_timeout: Duration::from_millis(5000),
      conflict_retries: 1,
    }
  }
}

/// Checkout service over any [`CheckoutStore`].
#[derive(Clone)]
pub struct Checkout {
  store: Arc<dyn CheckoutStore>,
  settings: CheckoutSettings,
}

impl Checkout {
  pub fn new(store: Arc<dyn CheckoutStore>, settings: CheckoutSettings) -> Self {
    Self { store, settings }
  }

  pub fn settings(&self) -> &CheckoutSettings {
    &self.settings
  }

  /// Places an order for `caller` from the submitted cart lines.
  ///
  /// Either the order is committed together with every stock decrement, or
  /// an error is returned and nothing was written.
  #[instrument(
    name = "checkout::place_order",
    skip(self, lines),
    fields(user_id = ?caller, line_count = lines.len()),
    err(Display)
  )]
  pub async fn place_order(&self, caller: Option<Uuid>, lines: Vec<CartLine>) -> CheckoutResult<OrderReceipt> {
    let user_id = caller.ok_or(CheckoutError::Unauthorized)?;
    let cart = Cart::from_lines(lines)?;

    let mut conflicts = 0;
    loop {
      match self.attempt_with_deadline(user_id, &cart).await {
        Err(CheckoutError::TransactionConflict) if conflicts < self.settings.conflict_retries => {
          conflicts += 1;
          warn!(attempt = conflicts, "Checkout transaction conflicted, retrying with a fresh transaction.");
        }
        Ok(receipt) => {
          info!(order_id = %receipt.order_id, total_cents = receipt.total_cents, "Order placed.");
          return Ok(receipt);
        }
        Err(err) => return Err(err),
      }
    }
  }

  async fn attempt_with_deadline(&self, user_id: Uuid, cart: &Cart) -> CheckoutResult<OrderReceipt> {
    let timeout = self.settings.attempt_timeout;
    // Dropping the timed-out attempt drops its transaction, which rolls it back.
    match tokio::time::timeout(timeout, self.attempt(user_id, cart)).await {
      Ok(result) => result,
      Err(_) => {
        warn!(timeout_ms = timeout.as_millis() as u64, "Checkout attempt exceeded its deadline.");
        Err(CheckoutError::Timeout {
          timeout_ms: timeout.as_millis() as u64,
        })
      }
    }
  }

  async fn attempt(&self, user_id: Uuid, cart: &Cart) -> CheckoutResult<OrderReceipt> {
    let mut tx = self.store.begin().await?;

    match reserve_and_record(tx.as_mut(), user_id, cart).await {
      Ok(order) => {
        tx.commit().await?;
        Ok(OrderReceipt::from(&order))
      }
      Err(err) => {
        if let Err(rollback_err) = tx.rollback().await {
          warn!(error = %rollback_err, "Rollback after failed checkout attempt also failed.");
        }
        Err(err)
      }
    }
  }
}

/// Everything that happens between `begin` and `commit`.
async fn reserve_and_record(tx: &mut dyn CheckoutTx, user_id: Uuid, cart: &Cart) -> CheckoutResult<NewOrder> {
  let rows = tx.load_products(&cart.product_ids()).await?;
  let by_id: HashMap<Uuid, ProductSnapshot> = rows.into_iter().map(|p| (p.id, p)).collect();

  let mut priced: Vec<(CartLine, &ProductSnapshot)> = Vec::with_capacity(cart.len());
  for line in cart.lines() {
    match by_id.get(&line.product_id) {
      Some(product) => priced.push((*line, product)),
      None => {
        return Err(CheckoutError::ProductNotFound {
          product_id: line.product_id,
        })
      }
    }
  }

  for (line, product) in &priced {
    if product.stock < line.quantity {
      return Err(insufficient(product, line.quantity));
    }
  }

  let mut total_cents: i64 = 0;
  let mut items = Vec::with_capacity(priced.len());
  for (line, product) in &priced {
    let line_total = product
      .price_cents
      .checked_mul(i64::from(line.quantity))
      .ok_or(CheckoutError::TotalOverflow)?;
    total_cents = total_cents.checked_add(line_total).ok_or(CheckoutError::TotalOverflow)?;
    items.push(NewOrderItem {
      id: Uuid::new_v4(),
      product_id: product.id,
      quantity: line.quantity,
      price_cents: product.price_cents,
    });
  }

  for line in cart.lines_in_lock_order() {
    if !tx.decrement_stock(line.product_id, line.quantity).await? {
      // Lost the race to a concurrent checkout; report what is left now.
      let current = tx.load_products(&[line.product_id]).await?;
      debug!(product_id = %line.product_id, "Conditional stock decrement matched no row.");
      return Err(match current.first() {
        Some(product) => insufficient(product, line.quantity),
        None => CheckoutError::ProductNotFound {
          product_id: line.product_id,
        },
      });
    }
  }

  let order = NewOrder {
    id: Uuid::new_v4(),
    user_id,
    status: OrderStatus::Pending,
    total_cents,
    items,
  };
  tx.insert_order(&order).await?;
  Ok(order)
}

fn insufficient(product: &ProductSnapshot, requested: i32) -> CheckoutError {
  CheckoutError::InsufficientStock {
    product_id: product.id,
    name: product.name.clone(),
    available: product.stock,
    requested,
  }
}
