// storefront_app/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use storefront_core::{CheckoutError, FlowError};
use thiserror::Error;

const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  /// A checkout line referenced something that cannot be a product id at all.
  #[error("Unknown product reference: {0}")]
  UnknownProduct(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Checkout Error: {0}")]
  Checkout(#[from] CheckoutError),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[source] sqlx::Error),

  #[error("Workflow Error: {0}")]
  Workflow(#[from] FlowError),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

// Constraint violations are client-visible conflicts, everything else stays a database failure.
impl From<sqlx::Error> for AppError {
  fn from(err: sqlx::Error) -> Self {
    if let sqlx::Error::Database(db_err) = &err {
      match db_err.code().as_deref() {
        Some(PG_UNIQUE_VIOLATION) => {
          return AppError::Conflict(format!(
            "A record with the same unique value already exists ({}).",
            db_err.constraint().unwrap_or("unique constraint")
          ))
        }
        Some(PG_FOREIGN_KEY_VIOLATION) => {
          return AppError::Conflict("The record is still referenced by other records.".to_string())
        }
        _ => {}
      }
    }
    AppError::Sqlx(err)
  }
}

impl AppError {
  fn checkout_status(err: &CheckoutError) -> StatusCode {
    match err {
      CheckoutError::Unauthorized => StatusCode::UNAUTHORIZED,
      CheckoutError::EmptyCart
      | CheckoutError::InvalidQuantity { .. }
      | CheckoutError::InsufficientStock { .. }
      | CheckoutError::TotalOverflow => StatusCode::BAD_REQUEST,
      CheckoutError::ProductNotFound { .. } => StatusCode::NOT_FOUND,
      CheckoutError::TransactionConflict | CheckoutError::Timeout { .. } => StatusCode::SERVICE_UNAVAILABLE,
      CheckoutError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn checkout_body(err: &CheckoutError) -> serde_json::Value {
    match err {
      CheckoutError::Unauthorized => json!({"error": "Authentication required."}),
      CheckoutError::EmptyCart => json!({"error": "Cart is empty."}),
      CheckoutError::InvalidQuantity { product_id, quantity } => json!({
        "error": "Quantity must be a positive integer.",
        "productId": product_id,
        "quantity": quantity,
      }),
      CheckoutError::ProductNotFound { product_id } => json!({
        "error": "Product not found.",
        "productId": product_id,
      }),
      CheckoutError::InsufficientStock {
        product_id,
        name,
        available,
        requested,
      } => json!({
        "error": format!("Insufficient stock for {}.", name),
        "productId": product_id,
        "productName": name,
        "available": available,
        "requested": requested,
      }),
      CheckoutError::TotalOverflow => json!({"error": "Order total is too large."}),
      CheckoutError::TransactionConflict | CheckoutError::Timeout { .. } => json!({
        "error": "Checkout could not be completed right now, please retry.",
        "retryable": true,
      }),
      CheckoutError::Storage { .. } => json!({"error": "Checkout failed due to a storage error."}),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::NotFound(_) | AppError::UnknownProduct(_) => StatusCode::NOT_FOUND,
      AppError::Conflict(_) => StatusCode::CONFLICT,
      AppError::Checkout(err) => Self::checkout_status(err),
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Workflow(_) | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, status = status.as_u16(), "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Responding with error");
    }

    let body = match self {
      AppError::Validation(m)
      | AppError::Auth(m)
      | AppError::Forbidden(m)
      | AppError::NotFound(m)
      | AppError::Conflict(m) => json!({"error": m}),
      AppError::UnknownProduct(raw) => json!({"error": "Product not found.", "productId": raw}),
      AppError::Checkout(err) => Self::checkout_body(err),
      AppError::Config(_) => json!({"error": "Configuration issue"}),
      AppError::Sqlx(_) => json!({"error": "Database operation failed"}),
      AppError::Workflow(source) => {
        tracing::error!(flow_error_source = ?source, "Workflow error details");
        json!({"error": "Workflow processing error"})
      }
      AppError::Internal(_) => json!({"error": "An internal error occurred"}),
    };
    HttpResponse::build(status).json(body)
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::body::MessageBody;
  use uuid::Uuid;

  fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
    let resp = err.error_response();
    let status = resp.status();
    let bytes = resp.into_body().try_into_bytes().unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[test]
  fn checkout_failures_map_to_documented_statuses() {
    let id = Uuid::new_v4();
    let cases = vec![
      (CheckoutError::Unauthorized, StatusCode::UNAUTHORIZED),
      (CheckoutError::EmptyCart, StatusCode::BAD_REQUEST),
      (
        CheckoutError::InvalidQuantity {
          product_id: id,
          quantity: -1,
        },
        StatusCode::BAD_REQUEST,
      ),
      (CheckoutError::ProductNotFound { product_id: id }, StatusCode::NOT_FOUND),
      (CheckoutError::TotalOverflow, StatusCode::BAD_REQUEST),
      (CheckoutError::TransactionConflict, StatusCode::SERVICE_UNAVAILABLE),
      (CheckoutError::Timeout { timeout_ms: 5000 }, StatusCode::SERVICE_UNAVAILABLE),
      (
        CheckoutError::Storage {
          source: anyhow::anyhow!("connection reset"),
        },
        StatusCode::INTERNAL_SERVER_ERROR,
      ),
    ];
    for (err, expected) in cases {
      assert_eq!(AppError::from(err).status_code(), expected);
    }
  }

  #[test]
  fn insufficient_stock_body_names_the_product() {
    let id = Uuid::new_v4();
    let (status, body) = body_json(AppError::from(CheckoutError::InsufficientStock {
      product_id: id,
      name: "Kopi".to_string(),
      available: 1,
      requested: 3,
    }));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["productId"], id.to_string());
    assert_eq!(body["productName"], "Kopi");
    assert_eq!(body["available"], 1);
    assert_eq!(body["requested"], 3);
  }

  #[test]
  fn unknown_product_reference_is_not_found() {
    let (status, body) = body_json(AppError::UnknownProduct("not-a-uuid".to_string()));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["productId"], "not-a-uuid");
  }

  #[test]
  fn internal_details_are_not_leaked() {
    let (status, body) = body_json(AppError::Internal("secret detail".to_string()));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.to_string().contains("secret detail"));

    let (status, _) = body_json(AppError::from(sqlx::Error::RowNotFound));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[test]
  fn access_errors() {
    assert_eq!(AppError::Auth("x".into()).status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(AppError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
    assert_eq!(AppError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
  }
}
