// storefront_app/src/db/mod.rs

//! Postgres access. Every query is a runtime `sqlx::query*` call.

pub mod checkout_store;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod sessions;
pub mod users;

pub use checkout_store::PgCheckoutStore;
