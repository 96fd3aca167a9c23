// storefront_app/src/db/dashboard.rs

use crate::models::{OrderStatus, UserRole};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

const RECENT_ORDERS: i64 = 5;
const LOW_STOCK_PRODUCTS: i64 = 5;
const RECENT_USERS: i64 = 6;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTotals {
  pub total_users: i64,
  pub total_products: i64,
  pub total_orders: i64,
  pub total_revenue_cents: i64,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrder {
  pub id: Uuid,
  pub status: OrderStatus,
  pub total_cents: i64,
  pub created_at: DateTime<Utc>,
  pub user_name: Option<String>,
  pub user_email: String,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LowStockProduct {
  pub id: Uuid,
  pub name: String,
  pub stock: i32,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecentUser {
  pub id: Uuid,
  pub name: Option<String>,
  pub email: String,
  pub role: UserRole,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
  pub status: OrderStatus,
  pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
  pub stats: DashboardTotals,
  pub recent_orders: Vec<RecentOrder>,
  pub low_stock_products: Vec<LowStockProduct>,
  pub recent_users: Vec<RecentUser>,
  pub order_status_stats: Vec<StatusCount>,
}

pub async fn load(pool: &PgPool, low_stock_threshold: i32) -> Result<Dashboard, sqlx::Error> {
  let (total_users, total_products, total_orders, total_revenue_cents) = tokio::try_join!(
    count(pool, "SELECT COUNT(*) FROM users"),
    count(pool, "SELECT COUNT(*) FROM products"),
    count(pool, "SELECT COUNT(*) FROM orders"),
    count(pool, "SELECT COALESCE(SUM(total_cents), 0)::BIGINT FROM orders"),
  )?;

  let recent_orders = sqlx::query_as::<_, RecentOrder>(
    "SELECT o.id, o.status, o.total_cents, o.created_at, u.name AS user_name, u.email AS user_email \
     FROM orders o JOIN users u ON u.id = o.user_id ORDER BY o.created_at DESC LIMIT $1",
  )
  .bind(RECENT_ORDERS)
  .fetch_all(pool);

  let low_stock_products =
    sqlx::query_as::<_, LowStockProduct>("SELECT id, name, stock FROM products WHERE stock <= $1 ORDER BY stock ASC LIMIT $2")
      .bind(low_stock_threshold)
      .bind(LOW_STOCK_PRODUCTS)
      .fetch_all(pool);

  let recent_users = sqlx::query_as::<_, RecentUser>("SELECT id, name, email, role FROM users ORDER BY created_at DESC LIMIT $1")
    .bind(RECENT_USERS)
    .fetch_all(pool);

  let order_status_stats =
    sqlx::query_as::<_, StatusCount>("SELECT status, COUNT(*) AS count FROM orders GROUP BY status ORDER BY status").fetch_all(pool);

  let (recent_orders, low_stock_products, recent_users, order_status_stats) =
    tokio::try_join!(recent_orders, low_stock_products, recent_users, order_status_stats)?;

  Ok(Dashboard {
    stats: DashboardTotals {
      total_users,
      total_products,
      total_orders,
      total_revenue_cents,
    },
    recent_orders,
    low_stock_products,
    recent_users,
    order_status_stats,
  })
}

async fn count(pool: &PgPool, sql: &'static str) -> Result<i64, sqlx::Error> {
  sqlx::query_scalar::<_, i64>(sql).fetch_one(pool).await
}
