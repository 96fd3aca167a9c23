// storefront_app/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use storefront_core::{ContextData, FlowOutcome};
use tracing::{info, instrument, warn};

use crate::db;
use crate::errors::AppError;
use crate::flows::contexts::{SigninCtxData, SignupCtxData};
use crate::models::UserRole;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct RegisterRequestPayload {
  pub email: String,
  pub password: String,
  pub name: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct SigninRequestPayload {
  pub email: String,
  pub password: String,
}

#[instrument(
    name = "handler::register",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email)
)]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<RegisterRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let req_payload = req_payload.into_inner();
  let signup_ctx = ContextData::new(SignupCtxData {
    app_state: app_state.get_ref().clone(),
    email: req_payload.email,
    password: req_payload.password,
    name: req_payload.name,
    role: UserRole::User,
    created_user: None,
  });

  match app_state.flows.run(signup_ctx.clone()).await? {
    FlowOutcome::Completed => {
      let user = signup_ctx.read().created_user.clone().ok_or_else(|| {
        warn!("Signup flow completed but no user was recorded in context.");
        AppError::Internal("Signup completed without creating a user.".to_string())
      })?;
      info!(user_id = %user.id, "Registration successful.");
      Ok(HttpResponse::Created().json(json!({
          "userId": user.id,
          "email": user.email,
      })))
    }
    FlowOutcome::Halted => Err(AppError::Internal("Signup process was halted by an internal step.".to_string())),
  }
}

#[instrument(
    name = "handler::signin",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email)
)]
pub async fn signin_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SigninRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let req_payload = req_payload.into_inner();
  let signin_ctx = ContextData::new(SigninCtxData {
    app_state: app_state.get_ref().clone(),
    email: req_payload.email,
    password: req_payload.password,
    user: None,
    session: None,
  });

  match app_state.flows.run(signin_ctx.clone()).await? {
    FlowOutcome::Completed => {
      let guard = signin_ctx.read();
      let (user, session) = match (&guard.user, &guard.session) {
        (Some(user), Some(session)) => (user, session),
        _ => {
          warn!("Signin flow completed without a user or session in context.");
          return Err(AppError::Internal("Signin completed without issuing a session.".to_string()));
        }
      };
      info!(user_id = %user.id, "Signin successful.");
      Ok(HttpResponse::Ok().json(json!({
          "token": session.token,
          "userId": user.id,
          "email": user.email,
          "role": user.role,
          "expiresAt": session.expires_at,
      })))
    }
    FlowOutcome::Halted => Err(AppError::Auth("Authentication process was unexpectedly halted.".to_string())),
  }
}

#[instrument(name = "handler::signout", skip(app_state, auth_user), fields(user_id = %auth_user.0.user_id))]
pub async fn signout_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  db::sessions::delete(&app_state.db_pool, &auth_user.0.token).await?;
  info!("Session ended.");
  Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn register_payload_name_is_optional() {
    let parsed: RegisterRequestPayload =
      serde_json::from_str(r#"{"email":"ani@example.com","password":"rahasia123"}"#).unwrap();
    assert!(parsed.name.is_none());
  }
}
