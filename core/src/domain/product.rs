// storefront_core/src/domain/product.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authoritative product state as read inside a checkout transaction.
///
/// Only the columns the checkout needs: the name for error reporting, the
/// price that gets captured on the order item, and the current stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
  pub id: Uuid,
  pub name: String,
  pub price_cents: i64,
  pub stock: i32,
}
