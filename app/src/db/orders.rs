// storefront_app/src/db/orders.rs

use crate::models::{Order, OrderItem, OrderWithItems};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

const ORDER_COLUMNS: &str = "id, user_id, status, total_cents, created_at, updated_at";

pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<OrderWithItems>, sqlx::Error> {
  let orders: Vec<Order> = sqlx::query_as(&format!(
    "SELECT {} FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
    ORDER_COLUMNS
  ))
  .bind(user_id)
  .fetch_all(pool)
  .await?;
  attach_items(pool, orders).await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<OrderWithItems>, sqlx::Error> {
  let orders: Vec<Order> = sqlx::query_as(&format!("SELECT {} FROM orders ORDER BY created_at DESC", ORDER_COLUMNS))
    .fetch_all(pool)
    .await?;
  attach_items(pool, orders).await
}

async fn attach_items(pool: &PgPool, orders: Vec<Order>) -> Result<Vec<OrderWithItems>, sqlx::Error> {
  if orders.is_empty() {
    return Ok(Vec::new());
  }
  let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
  let items: Vec<OrderItem> = sqlx::query_as(
    "SELECT oi.id, oi.order_id, oi.product_id, p.name AS product_name, oi.quantity, oi.price_cents \
     FROM order_items oi JOIN products p ON p.id = oi.product_id \
     WHERE oi.order_id = ANY($1) ORDER BY p.name ASC",
  )
  .bind(&ids)
  .fetch_all(pool)
  .await?;

  let mut by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
  for item in items {
    by_order.entry(item.order_id).or_default().push(item);
  }
  Ok(
    orders
      .into_iter()
      .map(|order| OrderWithItems {
        items: by_order.remove(&order.id).unwrap_or_default(),
        order,
      })
      .collect(),
  )
}
