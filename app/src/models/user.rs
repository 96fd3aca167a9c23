// storefront_app/src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

/// Mirrors the `user_role` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
  #[default]
  User,
  Admin,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: Uuid,
  pub email: String,
  pub name: Option<String>,
  #[serde(skip_serializing)] // Never send password hash to client
  pub password_hash: String,
  pub role: UserRole,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Admin listing row.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
  pub id: Uuid,
  pub email: String,
  pub name: Option<String>,
  pub role: UserRole,
  pub created_at: DateTime<Utc>,
  pub order_count: i64,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn password_hash_is_never_serialized() {
    let now = Utc::now();
    let user = User {
      id: Uuid::new_v4(),
      email: "a@b.c".to_string(),
      name: None,
      password_hash: "$argon2id$secret".to_string(),
      role: UserRole::Admin,
      created_at: now,
      updated_at: now,
    };
    let json = serde_json::to_value(&user).unwrap();
    assert!(json.get("passwordHash").is_none());
    assert_eq!(json["role"], "ADMIN");
  }
}
