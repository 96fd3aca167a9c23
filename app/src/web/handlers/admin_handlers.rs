// storefront_app/src/web/handlers/admin_handlers.rs

//! Back-office endpoints. Every handler takes an `AdminUser`, so anonymous
//! callers get 401 and non-admins 403 before any query runs.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use storefront_core::{ContextData, FlowOutcome};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::flows::contexts::SignupCtxData;
use crate::models::{ProductInput, UserRole};
use crate::state::AppState;
use crate::web::extractors::AdminUser;

#[derive(Deserialize, Debug)]
pub struct CreateUserRequestPayload {
  pub email: String,
  pub password: String,
  pub name: Option<String>,
  #[serde(default)]
  pub role: UserRole,
}

#[instrument(name = "handler::admin_dashboard", skip(app_state, _admin))]
pub async fn dashboard_handler(app_state: web::Data<AppState>, _admin: AdminUser) -> Result<HttpResponse, AppError> {
  let dashboard = db::dashboard::load(&app_state.db_pool, app_state.config.low_stock_threshold).await?;
  Ok(HttpResponse::Ok().json(dashboard))
}

#[instrument(name = "handler::admin_list_products", skip(app_state, _admin))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  let products = db::products::list_all(&app_state.db_pool).await?;
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::admin_create_product", skip(app_state, admin, req_payload), fields(admin_id = %admin.0.user_id))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  req_payload: web::Json<ProductInput>,
) -> Result<HttpResponse, AppError> {
  let input = req_payload.into_inner().validate()?;
  let product = db::products::create(&app_state.db_pool, &input).await?;
  info!(product_id = %product.id, slug = %product.slug, "Product created.");
  Ok(HttpResponse::Created().json(product))
}

#[instrument(
  name = "handler::admin_update_product",
  skip(app_state, admin, path, req_payload),
  fields(admin_id = %admin.0.user_id, product_id = %path.as_ref())
)]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<ProductInput>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let input = req_payload.into_inner().validate()?;
  match db::products::update(&app_state.db_pool, product_id, &input).await? {
    Some(product) => {
      info!(stock = product.stock, "Product updated.");
      Ok(HttpResponse::Ok().json(product))
    }
    None => Err(AppError::NotFound(format!("Product with ID {} not found.", product_id))),
  }
}

#[instrument(
  name = "handler::admin_delete_product",
  skip(app_state, admin, path),
  fields(admin_id = %admin.0.user_id, product_id = %path.as_ref())
)]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  // A product that appears on an order is protected by the foreign key and surfaces as a conflict.
  if db::products::delete(&app_state.db_pool, product_id).await? {
    info!("Product deleted.");
    Ok(HttpResponse::NoContent().finish())
  } else {
    Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)))
  }
}

#[instrument(name = "handler::admin_list_orders", skip(app_state, _admin))]
pub async fn list_orders_handler(app_state: web::Data<AppState>, _admin: AdminUser) -> Result<HttpResponse, AppError> {
  let orders = db::orders::list_all(&app_state.db_pool).await?;
  Ok(HttpResponse::Ok().json(orders))
}

#[instrument(name = "handler::admin_list_users", skip(app_state, _admin))]
pub async fn list_users_handler(app_state: web::Data<AppState>, _admin: AdminUser) -> Result<HttpResponse, AppError> {
  let users = db::users::list_summaries(&app_state.db_pool).await?;
  Ok(HttpResponse::Ok().json(users))
}

#[instrument(
  name = "handler::admin_create_user",
  skip(app_state, admin, req_payload),
  fields(admin_id = %admin.0.user_id, req_email = %req_payload.email)
)]
pub async fn create_user_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  req_payload: web::Json<CreateUserRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let req_payload = req_payload.into_inner();
  let signup_ctx = ContextData::new(SignupCtxData {
    app_state: app_state.get_ref().clone(),
    email: req_payload.email,
    password: req_payload.password,
    name: req_payload.name,
    role: req_payload.role,
    created_user: None,
  });

  match app_state.flows.run(signup_ctx.clone()).await? {
    FlowOutcome::Completed => {
      let user = signup_ctx.read().created_user.clone().ok_or_else(|| {
        warn!("Signup flow completed but no user was recorded in context.");
        AppError::Internal("User creation completed without a user.".to_string())
      })?;
      info!(user_id = %user.id, role = ?user.role, "User created by administrator.");
      Ok(HttpResponse::Created().json(user))
    }
    FlowOutcome::Halted => Err(AppError::Internal("User creation was halted by an internal step.".to_string())),
  }
}
