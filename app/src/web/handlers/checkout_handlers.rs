// storefront_app/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use storefront_core::{ContextData, FlowOutcome};
use tracing::{instrument, warn};

use crate::errors::AppError;
use crate::flows::contexts::{CheckoutCtxData, RequestedLine};
use crate::state::AppState;
use crate::web::extractors::Caller;

#[derive(Deserialize, Debug)]
pub struct CheckoutRequestPayload {
  #[serde(default)]
  pub items: Vec<RequestedLine>,
}

#[instrument(
    name = "handler::checkout",
    skip(app_state, caller, req_payload),
    fields(user_id = ?caller.user_id(), line_count = req_payload.items.len())
)]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  caller: Caller,
  req_payload: web::Json<CheckoutRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let checkout_ctx = ContextData::new(CheckoutCtxData::new(
    app_state.get_ref().clone(),
    caller.user_id(),
    req_payload.into_inner().items,
  ));

  match app_state.flows.run(checkout_ctx.clone()).await? {
    FlowOutcome::Completed => {
      let receipt = checkout_ctx.read().receipt.clone().ok_or_else(|| {
        warn!("Checkout flow completed but no receipt was recorded in context.");
        AppError::Internal("Checkout completed without an order.".to_string())
      })?;
      Ok(HttpResponse::Ok().json(json!({
          "orderId": receipt.order_id,
          "totalCents": receipt.total_cents,
      })))
    }
    FlowOutcome::Halted => Err(AppError::Internal("Checkout process was halted by an internal step.".to_string())),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::UserRole;
  use crate::state::lazy_test_state;
  use crate::web::extractors::Identity;
  use actix_web::body::to_bytes;
  use actix_web::http::StatusCode;
  use actix_web::ResponseError;
  use serde_json::Value;
  use storefront_core::MemoryStore;
  use uuid::Uuid;

  fn signed_in() -> Caller {
    Caller {
      identity: Some(Identity {
        user_id: Uuid::new_v4(),
        email: "ani@example.com".to_string(),
        role: UserRole::User,
        token: "ab".repeat(32),
      }),
    }
  }

  async fn checkout_as_user(store: &MemoryStore, items: Value) -> (StatusCode, Value) {
    let app_state = web::Data::new(lazy_test_state(store.clone()));
    let payload: CheckoutRequestPayload = serde_json::from_value(json!({ "items": items })).unwrap();
    let resp = match checkout_handler(app_state, signed_in(), web::Json(payload)).await {
      Ok(resp) => resp,
      Err(err) => err.error_response(),
    };
    let status = resp.status();
    let bytes = to_bytes(resp.into_body()).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[test]
  fn missing_items_field_is_an_empty_cart() {
    let parsed: CheckoutRequestPayload = serde_json::from_str("{}").unwrap();
    assert!(parsed.items.is_empty());
  }

  #[actix_web::test]
  async fn successful_checkout_returns_order_id_and_server_total() {
    let store = MemoryStore::new();
    let kopi = store.insert_product("Kopi Arabika", 1250, 3).await;

    let (status, body) = checkout_as_user(&store, json!([{ "id": kopi.to_string(), "qty": 2, "price": 1 }])).await;

    assert_eq!(status, StatusCode::OK);
    let orders = store.orders().await;
    assert_eq!(orders.len(), 1);
    assert_eq!(body["orderId"], orders[0].id.to_string());
    assert_eq!(body["totalCents"], 2500);
    assert_eq!(store.product(kopi).await.map(|p| p.stock), Some(1));
  }

  #[actix_web::test]
  async fn short_stock_is_a_400_naming_the_product() {
    let store = MemoryStore::new();
    let teh = store.insert_product("Teh Melati", 750, 3).await;

    let (status, body) = checkout_as_user(&store, json!([{ "id": teh.to_string(), "qty": 5 }])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["productId"], teh.to_string());
    assert_eq!(body["productName"], "Teh Melati");
    assert_eq!(body["available"], 3);
    assert_eq!(body["requested"], 5);
    assert_eq!(store.order_count().await, 0);
  }

  #[actix_web::test]
  async fn unknown_and_malformed_ids_are_404_with_product_id() {
    let store = MemoryStore::new();
    let missing = Uuid::new_v4();

    let (status, body) = checkout_as_user(&store, json!([{ "id": missing.to_string(), "qty": 1 }])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["productId"], missing.to_string());

    let (status, body) = checkout_as_user(&store, json!([{ "id": "nope", "qty": 1 }])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["productId"], "nope");
  }

  #[actix_web::test]
  async fn empty_cart_is_a_400() {
    let store = MemoryStore::new();
    let (status, body) = checkout_as_user(&store, json!([])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
  }
}
