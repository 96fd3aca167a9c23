// storefront_app/src/flows/mod.rs

//! Request workflows, each a `Flow` registered once at startup and run by
//! handlers through the shared `FlowRegistry`.

use crate::errors::AppError;
use storefront_core::FlowRegistry;

pub mod checkout_flow;
pub mod contexts;
pub mod signin_flow;
pub mod signup_flow;

pub fn register_all_flows(registry: &FlowRegistry<AppError>) {
  tracing::info!("Registering application flows...");

  checkout_flow::register_checkout_flow(registry);
  signup_flow::register_signup_flow(registry);
  signin_flow::register_signin_flow(registry);

  tracing::info!("All application flows registered.");
}
