// storefront_core/src/lib.rs

//! Storefront core: the checkout transaction and the pieces around it.
//!
//!  - [`checkout`]: validates a cart, re-reads authoritative prices and stock,
//!    decrements stock with a storage-level conditional update and writes the
//!    order, all in one transaction with a single conflict retry.
//!  - [`store`]: the unit-of-work ports a storage backend implements.
//!  - [`memory`]: an in-process backend for tests, benches and demos.
//!  - [`cart_state`]: the client-side cart container with a derived total.
//!  - [`flow`]: a step-based flow engine used to orchestrate request
//!    workflows.

pub mod cart_state;
pub mod checkout;
pub mod domain;
pub mod error;
pub mod flow;
pub mod memory;
pub mod store;

pub use crate::cart_state::{CartEntry, CartPersistence, CartState, CartStore, JsonFilePersistence, NoPersistence};
pub use crate::checkout::{Checkout, CheckoutSettings};
pub use crate::domain::{
  Cart, CartLine, NewOrder, NewOrderItem, OrderReceipt, OrderStatus, ProductSnapshot, ReceiptLine,
};
pub use crate::error::{CheckoutError, CheckoutResult, FlowError, StoreError};
pub use crate::flow::{ContextData, Flow, FlowOutcome, FlowRegistry, StepControl};
pub use crate::memory::MemoryStore;
pub use crate::store::{CheckoutStore, CheckoutTx};
