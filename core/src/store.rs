// storefront_core/src/store.rs

//! Storage ports consumed by the checkout transaction.
//!
//! A backend hands out one [`CheckoutTx`] per checkout attempt. Everything done
//! through it becomes visible atomically on [`CheckoutTx::commit`], or not at
//! all. Dropping a transaction without committing must discard its writes.

use crate::domain::{NewOrder, ProductSnapshot};
use crate::error::StoreError;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait CheckoutStore: Send + Sync {
  /// Opens a new transaction.
  async fn begin(&self) -> Result<Box<dyn CheckoutTx>, StoreError>;
}

#[async_trait]
pub trait CheckoutTx: Send {
  /// Reads the current rows for `ids`. Unknown ids are simply absent from the
  /// result; the order of the returned rows is unspecified.
  async fn load_products(&mut self, ids: &[Uuid]) -> Result<Vec<ProductSnapshot>, StoreError>;

  /// Atomic conditional decrement: lowers the product's stock by `quantity`
  /// only when at least `quantity` remains. Returns `false` when the guard
  /// failed (or the product is gone) and nothing changed.
  async fn decrement_stock(&mut self, product_id: Uuid, quantity: i32) -> Result<bool, StoreError>;

  /// Writes the order row and all of its items.
  async fn insert_order(&mut self, order: &NewOrder) -> Result<(), StoreError>;

  async fn commit(self: Box<Self>) -> Result<(), StoreError>;

  async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}
