// storefront_core/src/memory.rs

//! In-process implementation of the checkout storage ports.
//!
//! A transaction holds the store lock from `begin` until it is committed,
//! rolled back or dropped, so transactions are fully serialized. Writes are
//! staged on the transaction and only published by a successful commit.

use crate::domain::{NewOrder, ProductSnapshot};
use crate::error::StoreError;
use crate::store::{CheckoutStore, CheckoutTx};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Default)]
struct MemoryState {
  products: HashMap<Uuid, ProductSnapshot>,
  orders: Vec<NewOrder>,
  injected_conflicts: u32,
  commit_delay: Option<Duration>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a product and returns its generated id.
  pub async fn insert_product(&self, name: &str, price_cents: i64, stock: i32) -> Uuid {
    let id = Uuid::new_v4();
    self.state.lock().await.products.insert(
      id,
      ProductSnapshot {
        id,
        name: name.to_string(),
        price_cents,
        stock,
      },
    );
    id
  }

  pub async fn product(&self, id: Uuid) -> Option<ProductSnapshot> {
    self.state.lock().await.products.get(&id).cloned()
  }

  /// Direct stock set, as an admin edit would do. Returns false for an unknown id.
  pub async fn set_stock(&self, id: Uuid, stock: i32) -> bool {
    match self.state.lock().await.products.get_mut(&id) {
      Some(product) => {
        product.stock = stock;
        true
      }
      None => false,
    }
  }

  pub async fn orders(&self) -> Vec<NewOrder> {
    self.state.lock().await.orders.clone()
  }

  pub async fn order_count(&self) -> usize {
    self.state.lock().await.orders.len()
  }

  /// Makes the next `count` commits fail with [`StoreError::Conflict`].
  pub async fn inject_conflicts(&self, count: u32) {
    self.state.lock().await.injected_conflicts = count;
  }

  /// Delays every commit, keeping the store locked meanwhile.
  pub async fn set_commit_delay(&self, delay: Option<Duration>) {
    self.state.lock().await.commit_delay = delay;
  }
}

#[async_trait]
impl CheckoutStore for MemoryStore {
  async fn begin(&self) -> Result<Box<dyn CheckoutTx>, StoreError> {
    let guard = self.state.clone().lock_owned().await;
    Ok(Box::new(MemoryTx {
      guard,
      reserved: HashMap::new(),
      staged_orders: Vec::new(),
    }))
  }
}

struct MemoryTx {
  guard: OwnedMutexGuard<MemoryState>,
  /// Quantity taken from each product by this transaction so far.
  reserved: HashMap<Uuid, i32>,
  staged_orders: Vec<NewOrder>,
}

impl MemoryTx {
  fn visible_stock(&self, product: &ProductSnapshot) -> i32 {
    product.stock - self.reserved.get(&product.id).copied().unwrap_or(0)
  }
}

#[async_trait]
impl CheckoutTx for MemoryTx {
  async fn load_products(&mut self, ids: &[Uuid]) -> Result<Vec<ProductSnapshot>, StoreError> {
    Ok(
      ids
        .iter()
        .filter_map(|id| self.guard.products.get(id))
        .map(|product| ProductSnapshot {
          stock: self.visible_stock(product),
          ..product.clone()
        })
        .collect(),
    )
  }

  async fn decrement_stock(&mut self, product_id: Uuid, quantity: i32) -> Result<bool, StoreError> {
    let available = match self.guard.products.get(&product_id) {
      Some(product) => self.visible_stock(product),
      None => return Ok(false),
    };
    if available < quantity {
      return Ok(false);
    }
    *self.reserved.entry(product_id).or_insert(0) += quantity;
    Ok(true)
  }

  async fn insert_order(&mut self, order: &NewOrder) -> Result<(), StoreError> {
    if let Some(item) = order.items.iter().find(|i| !self.guard.products.contains_key(&i.product_id)) {
      return Err(StoreError::Backend(anyhow::anyhow!(
        "order item references unknown product {}",
        item.product_id
      )));
    }
    self.staged_orders.push(order.clone());
    Ok(())
  }

  async fn commit(mut self: Box<Self>) -> Result<(), StoreError> {
    if let Some(delay) = self.guard.commit_delay {
      tokio::time::sleep(delay).await;
    }
    if self.guard.injected_conflicts > 0 {
      self.guard.injected_conflicts -= 1;
      debug!("Injected conflict, discarding staged writes.");
      return Err(StoreError::Conflict);
    }

    let reserved = std::mem::take(&mut self.reserved);
    for (id, quantity) in reserved {
      if let Some(product) = self.guard.products.get_mut(&id) {
        product.stock -= quantity;
      }
    }
    let staged = std::mem::take(&mut self.staged_orders);
    self.guard.orders.extend(staged);
    Ok(())
  }

  async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
    debug!(discarded_orders = self.staged_orders.len(), "Memory transaction rolled back.");
    Ok(())
  }
}
