// storefront_app/src/db/checkout_store.rs

//! Postgres implementation of the checkout storage ports.
//!
//! Each checkout attempt runs in one `READ COMMITTED` transaction. The stock
//! guard lives in the `UPDATE ... WHERE stock >= $1` statement: Postgres
//! re-checks the predicate against the latest committed row after waiting on
//! a concurrent writer's row lock, so an oversell is impossible even without
//! `SERIALIZABLE`.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};
use storefront_core::{CheckoutStore, CheckoutTx, NewOrder, ProductSnapshot, StoreError};
use tracing::{debug, instrument};
use uuid::Uuid;

const PG_SERIALIZATION_FAILURE: &str = "40001";
const PG_DEADLOCK_DETECTED: &str = "40P01";

#[derive(Clone)]
pub struct PgCheckoutStore {
  pool: PgPool,
}

impl PgCheckoutStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CheckoutStore for PgCheckoutStore {
  async fn begin(&self) -> Result<Box<dyn CheckoutTx>, StoreError> {
    let tx = self.pool.begin().await.map_err(store_error)?;
    Ok(Box::new(PgCheckoutTx { tx }))
  }
}

pub struct PgCheckoutTx {
  tx: Transaction<'static, Postgres>,
}

#[derive(FromRow)]
struct SnapshotRow {
  id: Uuid,
  name: String,
  price_cents: i64,
  stock: i32,
}

#[async_trait]
impl CheckoutTx for PgCheckoutTx {
  async fn load_products(&mut self, ids: &[Uuid]) -> Result<Vec<ProductSnapshot>, StoreError> {
    let rows: Vec<SnapshotRow> =
      sqlx::query_as("SELECT id, name, price_cents, stock FROM products WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(store_error)?;

    Ok(
      rows
        .into_iter()
        .map(|r| ProductSnapshot {
          id: r.id,
          name: r.name,
          price_cents: r.price_cents,
          stock: r.stock,
        })
        .collect(),
    )
  }

  #[instrument(name = "pg_checkout::decrement_stock", skip(self), err(Display))]
  async fn decrement_stock(&mut self, product_id: Uuid, quantity: i32) -> Result<bool, StoreError> {
    let result =
      sqlx::query("UPDATE products SET stock = stock - $1, updated_at = NOW() WHERE id = $2 AND stock >= $1")
        .bind(quantity)
        .bind(product_id)
        .execute(&mut *self.tx)
        .await
        .map_err(store_error)?;

    Ok(result.rows_affected() == 1)
  }

  async fn insert_order(&mut self, order: &NewOrder) -> Result<(), StoreError> {
    sqlx::query("INSERT INTO orders (id, user_id, status, total_cents) VALUES ($1, $2, $3::order_status, $4)")
      .bind(order.id)
      .bind(order.user_id)
      .bind(order.status.as_str())
      .bind(order.total_cents)
      .execute(&mut *self.tx)
      .await
      .map_err(store_error)?;

    let mut items = QueryBuilder::<Postgres>::new("INSERT INTO order_items (id, order_id, product_id, quantity, price_cents) ");
    items.push_values(&order.items, |mut row, item| {
      row
        .push_bind(item.id)
        .push_bind(order.id)
        .push_bind(item.product_id)
        .push_bind(item.quantity)
        .push_bind(item.price_cents);
    });
    items.build().execute(&mut *self.tx).await.map_err(store_error)?;

    debug!(order_id = %order.id, items = order.items.len(), "Order rows written.");
    Ok(())
  }

  async fn commit(self: Box<Self>) -> Result<(), StoreError> {
    self.tx.commit().await.map_err(store_error)
  }

  async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
    self.tx.rollback().await.map_err(store_error)
  }
}

/// Serialization failures and deadlock victims are retryable conflicts.
fn store_error(err: sqlx::Error) -> StoreError {
  if let sqlx::Error::Database(db_err) = &err {
    if matches!(
      db_err.code().as_deref(),
      Some(PG_SERIALIZATION_FAILURE) | Some(PG_DEADLOCK_DETECTED)
    ) {
      return StoreError::Conflict;
    }
  }
  StoreError::Backend(anyhow::Error::new(err))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn non_database_errors_are_backend_failures() {
    assert!(matches!(store_error(sqlx::Error::PoolTimedOut), StoreError::Backend(_)));
    assert!(matches!(store_error(sqlx::Error::RowNotFound), StoreError::Backend(_)));
  }
}
