// storefront_app/src/flows/contexts.rs

//! Data carried through each flow. Handlers receive these wrapped in
//! `ContextData`.

use crate::models::{Session, User, UserRole};
use crate::state::AppState;
use serde::Deserialize;
use storefront_core::{CartLine, OrderReceipt};
use uuid::Uuid;

/// One cart line exactly as the client sent it. Any extra field, a price
/// included, is dropped during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestedLine {
  pub id: String,
  pub qty: i64,
}

#[derive(Clone)]
pub struct CheckoutCtxData {
  pub app_state: AppState,
  pub caller: Option<Uuid>,
  pub requested: Vec<RequestedLine>,
  pub lines: Vec<CartLine>,
  pub receipt: Option<OrderReceipt>,
}

impl CheckoutCtxData {
  pub fn new(app_state: AppState, caller: Option<Uuid>, requested: Vec<RequestedLine>) -> Self {
    Self {
      app_state,
      caller,
      requested,
      lines: Vec::new(),
      receipt: None,
    }
  }
}

/// Used by public registration and by admin user creation.
#[derive(Clone)]
pub struct SignupCtxData {
  pub app_state: AppState,
  pub email: String,
  pub password: String,
  pub name: Option<String>,
  pub role: UserRole,
  pub created_user: Option<User>,
}

#[derive(Clone)]
pub struct SigninCtxData {
  pub app_state: AppState,
  pub email: String,
  pub password: String,
  pub user: Option<User>,
  pub session: Option<Session>,
}
