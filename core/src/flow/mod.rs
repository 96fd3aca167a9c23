// storefront_core/src/flow/mod.rs

//! A small step-based flow engine.
//!
//! A [`Flow`] is an ordered list of named steps. Each step carries `before`,
//! `on` and `after` handlers that run against a shared [`ContextData`]. Flows
//! are registered once at startup in a [`FlowRegistry`] and dispatched by the
//! type of context they operate on.

pub mod context_data;
pub mod control;
pub mod definition;
pub mod execution;
pub mod registry;

pub use context_data::ContextData;
pub use control::{FlowOutcome, StepControl};
pub use definition::{Flow, Handler, StepDef};
pub use registry::FlowRegistry;
