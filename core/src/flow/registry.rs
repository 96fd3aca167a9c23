// storefront_core/src/flow/registry.rs

//! `FlowRegistry<E>`: flows keyed by the type of context they run on.

use super::context_data::ContextData;
use super::control::FlowOutcome;
use super::definition::Flow;
use crate::error::FlowError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, Level};

#[async_trait]
trait ErasedFlow<AppErr>: Send + Sync
where
  AppErr: std::error::Error + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<FlowOutcome, AppErr>;
}

struct Registered<TData, HandlerErr, AppErr>
where
  TData: 'static + Send + Sync,
  HandlerErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  flow: Flow<TData, HandlerErr>,
  _app_err: PhantomData<fn() -> AppErr>,
}

#[async_trait]
impl<TData, HandlerErr, AppErr> ErasedFlow<AppErr> for Registered<TData, HandlerErr, AppErr>
where
  TData: 'static + Send + Sync,
  HandlerErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
  AppErr: std::error::Error + From<HandlerErr> + From<FlowError> + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<FlowOutcome, AppErr> {
    let typed = ctx.downcast::<ContextData<TData>>().map_err(|_| {
      AppErr::from(FlowError::TypeMismatch {
        expected_type: std::any::type_name::<TData>().to_string(),
      })
    })?;
    self.flow.run(*typed).await.map_err(AppErr::from)
  }
}

/// Holds one flow per context type. Register everything at startup, then
/// share the registry (usually behind an `Arc`) with request handlers.
pub struct FlowRegistry<AppErr>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  flows: RwLock<HashMap<TypeId, Arc<dyn ErasedFlow<AppErr>>>>,
}

impl<AppErr> Default for FlowRegistry<AppErr>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<AppErr> FlowRegistry<AppErr>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      flows: RwLock::new(HashMap::new()),
    }
  }

  /// Registers `flow` for contexts of type `TData`, replacing any earlier one.
  pub fn register<TData, HandlerErr>(&self, flow: Flow<TData, HandlerErr>)
  where
    TData: 'static + Send + Sync,
    HandlerErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
    AppErr: From<HandlerErr>,
  {
    event!(Level::DEBUG, context = %std::any::type_name::<TData>(), steps = flow.steps().len(), "Registering flow.");
    let entry: Arc<dyn ErasedFlow<AppErr>> = Arc::new(Registered::<TData, HandlerErr, AppErr> {
      flow,
      _app_err: PhantomData,
    });
    self.flows.write().insert(TypeId::of::<TData>(), entry);
  }

  pub fn is_registered<TData: 'static + Send + Sync>(&self) -> bool {
    self.flows.read().contains_key(&TypeId::of::<TData>())
  }

  /// Runs the flow registered for `TData`. The caller keeps its own clone of
  /// `ctx_data` to read results afterwards.
  pub async fn run<TData>(&self, ctx_data: ContextData<TData>) -> Result<FlowOutcome, AppErr>
  where
    TData: 'static + Send + Sync,
  {
    let flow = self.flows.read().get(&TypeId::of::<TData>()).cloned();
    let flow = flow.ok_or_else(|| {
      let type_name = std::any::type_name::<TData>();
      event!(Level::ERROR, context = %type_name, "No flow registered for context type.");
      AppErr::from(FlowError::NotRegistered {
        type_name: type_name.to_string(),
      })
    })?;
    flow.run_erased(Box::new(ctx_data)).await
  }
}
