// storefront_app/src/web/routes.rs

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::errors::AppError;
use crate::web::handlers::{admin_handlers, auth_handlers, checkout_handlers, order_handlers, product_handlers};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Malformed bodies get the same JSON error shape as every other 400.
fn json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(|err, _req| AppError::Validation(format!("Invalid JSON body: {}", err)).into())
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(json_config())
    .route("/health", web::get().to(health_check_handler))
    .service(
      web::scope("/auth")
        .route("/register", web::post().to(auth_handlers::register_handler))
        .route("/signin", web::post().to(auth_handlers::signin_handler))
        .route("/signout", web::post().to(auth_handlers::signout_handler)),
    )
    .route("/checkout", web::post().to(checkout_handlers::checkout_handler))
    .route("/orders", web::get().to(order_handlers::list_my_orders_handler))
    .service(
      web::scope("/products")
        .route("", web::get().to(product_handlers::list_products_handler))
        .route("/{slug}", web::get().to(product_handlers::get_product_handler)),
    )
    .service(
      web::scope("/admin")
        .route("/dashboard", web::get().to(admin_handlers::dashboard_handler))
        .route("/products", web::get().to(admin_handlers::list_products_handler))
        .route("/products", web::post().to(admin_handlers::create_product_handler))
        .route("/products/{id}", web::put().to(admin_handlers::update_product_handler))
        .route("/products/{id}", web::delete().to(admin_handlers::delete_product_handler))
        .route("/orders", web::get().to(admin_handlers::list_orders_handler))
        .route("/users", web::get().to(admin_handlers::list_users_handler))
        .route("/users", web::post().to(admin_handlers::create_user_handler)),
    );
}
