// storefront_app/src/models/product.rs

use crate::errors::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub slug: String,
  pub description: Option<String>,
  pub image: Option<String>,
  pub price_cents: i64,
  pub stock: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Body of the admin create/update endpoints.
///
/// Every field is optional at the serde level so a missing field produces a
/// readable validation error instead of a generic JSON rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
  pub name: Option<String>,
  pub slug: Option<String>,
  pub price_cents: Option<i64>,
  pub stock: Option<i32>,
  pub description: Option<String>,
  pub image: Option<String>,
}

/// A product input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidProduct {
  pub name: String,
  pub slug: String,
  pub price_cents: i64,
  pub stock: i32,
  pub description: Option<String>,
  pub image: Option<String>,
}

impl ProductInput {
  pub fn validate(self) -> Result<ValidProduct, AppError> {
    let name = self.name.map(|n| n.trim().to_string()).unwrap_or_default();
    if name.is_empty() {
      return Err(AppError::Validation("Field 'name' is required.".to_string()));
    }
    let slug = self.slug.map(|s| s.trim().to_string()).unwrap_or_default();
    if !is_valid_slug(&slug) {
      return Err(AppError::Validation(
        "Field 'slug' is required and may only contain lowercase letters, digits and single hyphens.".to_string(),
      ));
    }
    let price_cents = self
      .price_cents
      .ok_or_else(|| AppError::Validation("Field 'priceCents' is required.".to_string()))?;
    if price_cents < 0 {
      return Err(AppError::Validation("Field 'priceCents' must not be negative.".to_string()));
    }
    let stock = self
      .stock
      .ok_or_else(|| AppError::Validation("Field 'stock' is required.".to_string()))?;
    if stock < 0 {
      return Err(AppError::Validation("Field 'stock' must not be negative.".to_string()));
    }

    Ok(ValidProduct {
      name,
      slug,
      price_cents,
      stock,
      description: self.description.filter(|d| !d.trim().is_empty()),
      image: self.image.filter(|i| !i.trim().is_empty()),
    })
  }
}

/// Lowercase ASCII letters and digits separated by single hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
  !slug.is_empty()
    && !slug.starts_with('-')
    && !slug.ends_with('-')
    && !slug.contains("--")
    && slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
