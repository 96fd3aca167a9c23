// storefront_app/src/models/mod.rs

//! Rows read from and written to Postgres.

pub mod order;
pub mod order_item;
pub mod product;
pub mod session;
pub mod user;

pub use order::{Order, OrderStatus, OrderWithItems};
pub use order_item::OrderItem;
pub use product::{Product, ProductInput};
pub use session::Session;
pub use user::{User, UserRole, UserSummary};
