// storefront_app/src/db/products.rs

use crate::models::product::{Product, ValidProduct};
use sqlx::PgPool;
use uuid::Uuid;

const PRODUCT_COLUMNS: &str = "id, name, slug, description, image, price_cents, stock, created_at, updated_at";

pub async fn list_all(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
  sqlx::query_as(&format!("SELECT {} FROM products ORDER BY name ASC", PRODUCT_COLUMNS))
    .fetch_all(pool)
    .await
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Product>, sqlx::Error> {
  sqlx::query_as(&format!("SELECT {} FROM products WHERE slug = $1", PRODUCT_COLUMNS))
    .bind(slug)
    .fetch_optional(pool)
    .await
}

pub async fn create(pool: &PgPool, input: &ValidProduct) -> Result<Product, sqlx::Error> {
  sqlx::query_as(&format!(
    "INSERT INTO products (id, name, slug, description, image, price_cents, stock) \
     VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
    PRODUCT_COLUMNS
  ))
  .bind(Uuid::new_v4())
  .bind(&input.name)
  .bind(&input.slug)
  .bind(&input.description)
  .bind(&input.image)
  .bind(input.price_cents)
  .bind(input.stock)
  .fetch_one(pool)
  .await
}

/// Full replacement, stock included. Returns `None` for an unknown id.
pub async fn update(pool: &PgPool, id: Uuid, input: &ValidProduct) -> Result<Option<Product>, sqlx::Error> {
  sqlx::query_as(&format!(
    "UPDATE products SET name = $2, slug = $3, description = $4, image = $5, price_cents = $6, stock = $7, \
     updated_at = NOW() WHERE id = $1 RETURNING {}",
    PRODUCT_COLUMNS
  ))
  .bind(id)
  .bind(&input.name)
  .bind(&input.slug)
  .bind(&input.description)
  .bind(&input.image)
  .bind(input.price_cents)
  .bind(input.stock)
  .fetch_optional(pool)
  .await
}

/// Returns `false` when no product had this id.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
  let result = sqlx::query("DELETE FROM products WHERE id = $1")
    .bind(id)
    .execute(pool)
    .await?;
  Ok(result.rows_affected() == 1)
}
