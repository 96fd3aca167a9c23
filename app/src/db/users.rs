// storefront_app/src/db/users.rs

use crate::models::{User, UserRole, UserSummary};
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, name, password_hash, role, created_at, updated_at";

pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
  sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
    .bind(email)
    .fetch_one(pool)
    .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
  sqlx::query_as(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn create(
  pool: &PgPool,
  email: &str,
  name: Option<&str>,
  password_hash: &str,
  role: UserRole,
) -> Result<User, sqlx::Error> {
  sqlx::query_as(&format!(
    "INSERT INTO users (id, email, name, password_hash, role) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
    USER_COLUMNS
  ))
  .bind(Uuid::new_v4())
  .bind(email)
  .bind(name)
  .bind(password_hash)
  .bind(role)
  .fetch_one(pool)
  .await
}

pub async fn list_summaries(pool: &PgPool) -> Result<Vec<UserSummary>, sqlx::Error> {
  sqlx::query_as(
    "SELECT u.id, u.email, u.name, u.role, u.created_at, COUNT(o.id) AS order_count \
     FROM users u LEFT JOIN orders o ON o.user_id = u.id \
     GROUP BY u.id ORDER BY u.created_at DESC",
  )
  .fetch_all(pool)
  .await
}
