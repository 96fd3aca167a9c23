// storefront_app/src/web/extractors.rs

//! Session-backed request identity.
//!
//! `Caller` never rejects a request: a missing, unknown or expired bearer
//! token just yields an anonymous caller. `AuthenticatedUser` and
//! `AdminUser` build on it and turn anonymous callers into 401 and
//! non-admins into 403.

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::models::UserRole;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct Identity {
  pub user_id: Uuid,
  pub email: String,
  pub role: UserRole,
  pub token: String,
}

#[derive(Debug, Clone, Default)]
pub struct Caller {
  pub identity: Option<Identity>,
}

impl Caller {
  pub fn user_id(&self) -> Option<Uuid> {
    self.identity.as_ref().map(|i| i.user_id)
  }
}

/// Extracts the token from an `Authorization: Bearer <token>` value.
pub fn parse_bearer(header_value: &str) -> Option<String> {
  let (scheme, token) = header_value.trim().split_once(' ')?;
  if !scheme.eq_ignore_ascii_case("bearer") {
    return None;
  }
  let token = token.trim();
  (!token.is_empty()).then(|| token.to_string())
}

impl FromRequest for Caller {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let token = req
      .headers()
      .get(AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .and_then(parse_bearer);
    let app_state = req.app_data::<web::Data<AppState>>().cloned();

    Box::pin(async move {
      let Some(token) = token else {
        return Ok(Caller::default());
      };
      let app_state =
        app_state.ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;

      match db::sessions::find_user_by_token(&app_state.db_pool, &token).await? {
        Some(user) => {
          debug!(user_id = %user.id, "Request authenticated by session token.");
          Ok(Caller {
            identity: Some(Identity {
              user_id: user.id,
              email: user.email,
              role: user.role,
              token,
            }),
          })
        }
        None => {
          debug!("Bearer token did not match an active session.");
          Ok(Caller::default())
        }
      }
    })
  }
}

#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let caller = Caller::extract(req);
    Box::pin(async move {
      match caller.await?.identity {
        Some(identity) => Ok(AuthenticatedUser(identity)),
        None => {
          warn!("Rejecting request without an active session.");
          Err(AppError::Auth("Authentication required.".to_string()))
        }
      }
    })
  }
}

#[derive(Debug, Clone)]
pub struct AdminUser(pub Identity);

impl FromRequest for AdminUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let user = AuthenticatedUser::extract(req);
    Box::pin(async move {
      let AuthenticatedUser(identity) = user.await?;
      if identity.role != UserRole::Admin {
        warn!(user_id = %identity.user_id, "Non-admin caller on an admin route.");
        return Err(AppError::Forbidden("Administrator access required.".to_string()));
      }
      Ok(AdminUser(identity))
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bearer_header_parsing() {
    assert_eq!(parse_bearer("Bearer abc123"), Some("abc123".to_string()));
    assert_eq!(parse_bearer("bearer   abc123  "), Some("abc123".to_string()));
    assert_eq!(parse_bearer("Basic dXNlcjpwdw=="), None);
    assert_eq!(parse_bearer("Bearer "), None);
    assert_eq!(parse_bearer("abc123"), None);
  }

  #[actix_web::test]
  async fn missing_header_yields_anonymous_caller() {
    let req = actix_web::test::TestRequest::default().to_http_request();
    let caller = Caller::extract(&req).await.unwrap();
    assert!(caller.user_id().is_none());
  }

  #[actix_web::test]
  async fn protected_extractors_reject_anonymous_callers() {
    let req = actix_web::test::TestRequest::default().to_http_request();
    assert!(matches!(AuthenticatedUser::extract(&req).await, Err(AppError::Auth(_))));
    assert!(matches!(AdminUser::extract(&req).await, Err(AppError::Auth(_))));
  }
}
