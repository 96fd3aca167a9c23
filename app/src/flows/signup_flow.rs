// storefront_app/src/flows/signup_flow.rs

use crate::db;
use crate::errors::AppError;
use crate::flows::contexts::SignupCtxData;
use crate::services::auth_service;
use storefront_core::{ContextData, Flow, FlowRegistry, StepControl};
use tracing::{event, info, warn, Level};

const MIN_PASSWORD_LEN: usize = 8;

pub fn register_signup_flow(registry: &FlowRegistry<AppError>) {
  let mut signup_f = Flow::<SignupCtxData, AppError>::new(&[
    ("validate_signup_input", false),
    ("check_existing_user", false),
    ("create_user_in_db", false),
  ]);

  signup_f.on("validate_signup_input", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      guard.email = guard.email.trim().to_lowercase();
      guard.name = guard.name.take().map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
      validate_signup(&guard.email, &guard.password)?;
      event!(Level::DEBUG, email = %guard.email, "Signup input validated.");
      Ok::<_, AppError>(StepControl::Continue)
    })
  });

  signup_f.on("check_existing_user", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let (email, db_pool) = {
        let guard = ctx_data.read();
        (guard.email.clone(), guard.app_state.db_pool.clone())
      };

      if db::users::email_exists(&db_pool, &email).await? {
        warn!(%email, "Attempt to sign up with an existing email.");
        return Err(AppError::Conflict("An account with this email already exists.".to_string()));
      }
      Ok::<_, AppError>(StepControl::Continue)
    })
  });

  signup_f.on("create_user_in_db", |ctx_data: ContextData<SignupCtxData>| {
    Box::pin(async move {
      let (email, password, name, role, db_pool) = {
        let guard = ctx_data.read();
        (
          guard.email.clone(),
          guard.password.clone(),
          guard.name.clone(),
          guard.role,
          guard.app_state.db_pool.clone(),
        )
      };

      let password_hash = auth_service::hash_password(&password)?;
      // A concurrent signup for the same email surfaces here as a unique violation.
      let user = db::users::create(&db_pool, &email, name.as_deref(), &password_hash, role).await?;
      info!(user_id = %user.id, role = ?user.role, "User created.");
      ctx_data.write().created_user = Some(user);
      Ok::<_, AppError>(StepControl::Continue)
    })
  });

  registry.register(signup_f);
  tracing::info!("Sign-up flow registered.");
}

pub fn validate_signup(email: &str, password: &str) -> Result<(), AppError> {
  if email.is_empty() || !email.contains('@') {
    return Err(AppError::Validation("Valid email is required.".to_string()));
  }
  if password.len() < MIN_PASSWORD_LEN {
    return Err(AppError::Validation(format!(
      "Password must be at least {} characters long.",
      MIN_PASSWORD_LEN
    )));
  }
  Ok(())
}
