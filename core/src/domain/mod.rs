// storefront_core/src/domain/mod.rs

//! Value types shared by the checkout transaction and its storage backends.

pub mod cart;
pub mod order;
pub mod product;

pub use cart::{Cart, CartLine};
pub use order::{NewOrder, NewOrderItem, OrderReceipt, OrderStatus, ReceiptLine};
pub use product::ProductSnapshot;
