// storefront_core/src/domain/order.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle label stored on an order. Checkout always creates `Pending`;
/// nothing in this crate moves an order between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Completed,
  Cancelled,
}

impl OrderStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Completed => "completed",
      OrderStatus::Cancelled => "cancelled",
    }
  }
}

/// A line item priced from the authoritative product row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
  pub id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub price_cents: i64,
}

/// The order a checkout writes, together with all of its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
  pub id: Uuid,
  pub user_id: Uuid,
  pub status: OrderStatus,
  pub total_cents: i64,
  pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
  pub product_id: Uuid,
  pub quantity: i32,
  pub unit_price_cents: i64,
}

/// What a successful checkout hands back to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
  pub order_id: Uuid,
  pub total_cents: i64,
  pub items: Vec<ReceiptLine>,
}

impl From<&NewOrder> for OrderReceipt {
  fn from(order: &NewOrder) -> Self {
    Self {
      order_id: order.id,
      total_cents: order.total_cents,
      items: order
        .items
        .iter()
        .map(|item| ReceiptLine {
          product_id: item.product_id,
          quantity: item.quantity,
          unit_price_cents: item.price_cents,
        })
        .collect(),
    }
  }
}
