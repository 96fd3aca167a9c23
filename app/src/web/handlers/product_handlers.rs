// storefront_app/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::{info, instrument};

use crate::db;
use crate::errors::AppError;
use crate::state::AppState;

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = db::products::list_all(&app_state.db_pool).await?;
  info!(count = products.len(), "Products fetched.");
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(slug = %path.as_str()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let slug = path.into_inner();
  match db::products::find_by_slug(&app_state.db_pool, &slug).await? {
    Some(product) => Ok(HttpResponse::Ok().json(product)),
    None => Err(AppError::NotFound(format!("Product '{}' not found.", slug))),
  }
}
