// storefront_app/src/flows/checkout_flow.rs

use crate::errors::AppError;
use crate::flows::contexts::{CheckoutCtxData, RequestedLine};
use storefront_core::{CartLine, CheckoutError, ContextData, Flow, FlowRegistry, StepControl};
use tracing::{event, info, Level};
use uuid::Uuid;

pub fn register_checkout_flow(registry: &FlowRegistry<AppError>) {
  let mut checkout_f = Flow::<CheckoutCtxData, AppError>::new(&[
    ("authorize_caller", false),
    ("parse_cart_lines", false),
    ("place_order", false),
  ]);

  // Unauthenticated callers are turned away before the cart is even looked at.
  checkout_f.on("authorize_caller", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      if ctx_data.read().caller.is_none() {
        return Err(AppError::Checkout(CheckoutError::Unauthorized));
      }
      Ok::<_, AppError>(StepControl::Continue)
    })
  });

  checkout_f.on("parse_cart_lines", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let requested = ctx_data.read().requested.clone();
      let lines = parse_lines(&requested)?;
      event!(Level::DEBUG, lines = lines.len(), "Cart lines parsed.");
      ctx_data.write().lines = lines;
      Ok::<_, AppError>(StepControl::Continue)
    })
  });

  checkout_f.on("place_order", |ctx_data: ContextData<CheckoutCtxData>| {
    Box::pin(async move {
      let (checkout, caller, lines) = {
        let guard = ctx_data.read();
        (guard.app_state.checkout.clone(), guard.caller, guard.lines.clone())
      };

      let receipt = checkout.place_order(caller, lines).await?;
      info!(order_id = %receipt.order_id, total_cents = receipt.total_cents, "Checkout flow placed order.");
      ctx_data.write().receipt = Some(receipt);
      Ok::<_, AppError>(StepControl::Continue)
    })
  });

  registry.register(checkout_f);
  tracing::info!("Checkout flow registered.");
}

/// Turns wire lines into typed cart lines. An id that is not a UUID cannot
/// name any product, so it is reported as not found.
pub fn parse_lines(requested: &[RequestedLine]) -> Result<Vec<CartLine>, AppError> {
  requested
    .iter()
    .map(|line| {
      let product_id = Uuid::parse_str(line.id.trim()).map_err(|_| AppError::UnknownProduct(line.id.clone()))?;
      let quantity = i32::try_from(line.qty)
        .ok()
        .filter(|q| *q > 0)
        .ok_or(AppError::Checkout(CheckoutError::InvalidQuantity {
          product_id,
          quantity: line.qty,
        }))?;
      Ok(CartLine::new(product_id, quantity))
    })
    .collect()
}
