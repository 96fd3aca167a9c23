// storefront_app/src/flows/signin_flow.rs

use crate::db;
use crate::errors::AppError;
use crate::flows::contexts::SigninCtxData;
use crate::services::auth_service;
use chrono::{Duration, Utc};
use storefront_core::{ContextData, Flow, FlowRegistry, StepControl};
use tracing::{event, info, warn, Level};

const INVALID_CREDENTIALS: &str = "Invalid email or password.";

pub fn register_signin_flow(registry: &FlowRegistry<AppError>) {
  let mut signin_f = Flow::<SigninCtxData, AppError>::new(&[
    ("validate_signin_input", false),
    ("fetch_user_by_email", false),
    ("verify_user_password", false),
    ("issue_session_token", false),
  ]);

  signin_f.on("validate_signin_input", |ctx_data: ContextData<SigninCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      guard.email = guard.email.trim().to_lowercase();
      if guard.email.is_empty() || !guard.email.contains('@') {
        return Err(AppError::Validation("Valid email is required.".to_string()));
      }
      if guard.password.is_empty() {
        return Err(AppError::Validation("Password is required.".to_string()));
      }
      Ok::<_, AppError>(StepControl::Continue)
    })
  });

  signin_f.on("fetch_user_by_email", |ctx_data: ContextData<SigninCtxData>| {
    Box::pin(async move {
      let (email, db_pool) = {
        let guard = ctx_data.read();
        (guard.email.clone(), guard.app_state.db_pool.clone())
      };

      match db::users::find_by_email(&db_pool, &email).await? {
        Some(user) => {
          event!(Level::DEBUG, user_id = %user.id, "User found for signin.");
          ctx_data.write().user = Some(user);
          Ok::<_, AppError>(StepControl::Continue)
        }
        None => {
          warn!(%email, "Signin for unknown email.");
          Err(AppError::Auth(INVALID_CREDENTIALS.to_string()))
        }
      }
    })
  });

  signin_f.on("verify_user_password", |ctx_data: ContextData<SigninCtxData>| {
    Box::pin(async move {
      let (stored_hash, password, user_id) = {
        let guard = ctx_data.read();
        let user = guard
          .user
          .as_ref()
          .ok_or_else(|| AppError::Internal("User missing from signin context.".to_string()))?;
        (user.password_hash.clone(), guard.password.clone(), user.id)
      };

      if !auth_service::verify_password(&stored_hash, &password)? {
        warn!(%user_id, "Password mismatch on signin.");
        return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
      }
      Ok::<_, AppError>(StepControl::Continue)
    })
  });

  signin_f.on("issue_session_token", |ctx_data: ContextData<SigninCtxData>| {
    Box::pin(async move {
      let (user_id, db_pool, ttl_hours) = {
        let guard = ctx_data.read();
        let user_id = guard
          .user
          .as_ref()
          .map(|u| u.id)
          .ok_or_else(|| AppError::Internal("User missing from signin context.".to_string()))?;
        (user_id, guard.app_state.db_pool.clone(), guard.app_state.config.session_ttl_hours)
      };

      let token = auth_service::generate_session_token();
      let expires_at = Utc::now() + Duration::hours(ttl_hours);
      let session = db::sessions::create(&db_pool, &token, user_id, expires_at).await?;

      info!(%user_id, expires_at = %session.expires_at, "Session issued.");
      ctx_data.write().session = Some(session);
      Ok::<_, AppError>(StepControl::Continue)
    })
  });

  registry.register(signin_f);
  tracing::info!("Sign-in flow registered.");
}
