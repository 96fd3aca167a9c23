// storefront_app/src/db/sessions.rs

use crate::models::{Session, User};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create(
  pool: &PgPool,
  token: &str,
  user_id: Uuid,
  expires_at: DateTime<Utc>,
) -> Result<Session, sqlx::Error> {
  sqlx::query_as(
    "INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3) \
     RETURNING token, user_id, expires_at, created_at",
  )
  .bind(token)
  .bind(user_id)
  .bind(expires_at)
  .fetch_one(pool)
  .await
}

/// The user behind an unexpired session token.
pub async fn find_user_by_token(pool: &PgPool, token: &str) -> Result<Option<User>, sqlx::Error> {
  sqlx::query_as(
    "SELECT u.id, u.email, u.name, u.password_hash, u.role, u.created_at, u.updated_at \
     FROM sessions s JOIN users u ON u.id = s.user_id \
     WHERE s.token = $1 AND s.expires_at > NOW()",
  )
  .bind(token)
  .fetch_optional(pool)
  .await
}

pub async fn delete(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
  sqlx::query("DELETE FROM sessions WHERE token = $1")
    .bind(token)
    .execute(pool)
    .await?;
  Ok(())
}
