// kiosk-core/src/flow/registry.rs

//! `FlowRegistry<AppErr>`: flows keyed by the type of data their context holds.

use super::{ContextData, Flow, FlowOutcome};
use crate::error::FlowError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[async_trait]
trait ErasedFlow<AppErr>: Send + Sync {
  fn flow_name(&self) -> &str;

  /// `ctx` must hold a `ContextData<TData>` for the flow's own `TData`.
  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<FlowOutcome, AppErr>;
}

struct TypedFlow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  flow: Flow<TData, Err>,
}

#[async_trait]
impl<TData, Err, AppErr> ErasedFlow<AppErr> for TypedFlow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
  AppErr: From<Err> + From<FlowError> + Send + 'static,
{
  fn flow_name(&self) -> &str {
    self.flow.name()
  }

  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<FlowOutcome, AppErr> {
    let ctx_data = match ctx.downcast::<ContextData<TData>>() {
      Ok(boxed) => *boxed,
      Err(_) => {
        return Err(<AppErr as From<FlowError>>::from(FlowError::TypeMismatch {
          flow: self.flow.name().to_string(),
          expected_type: type_name::<ContextData<TData>>().to_string(),
        }))
      }
    };
    self.flow.run(ctx_data).await.map_err(<AppErr as From<Err>>::from)
  }
}

/// Holds one flow per context data type and dispatches runs to it.
pub struct FlowRegistry<AppErr>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  flows: RwLock<HashMap<TypeId, Arc<dyn ErasedFlow<AppErr>>>>,
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

  /// Registers `flow` for contexts of type `ContextData<TData>`, replacing any
  /// flow registered for the same type.
  pub fn register<TData, Err>(&self, flow: Flow<TData, Err>)
  where
    TData: 'static + Send + Sync,
    Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
    AppErr: From<Err>,
  {
    let flow_name = flow.name().to_string();
    let previous = self
      .flows
      .write()
      .insert(TypeId::of::<TData>(), Arc::new(TypedFlow { flow }));
    if let Some(previous) = previous {
      warn!(replaced = previous.flow_name(), flow = %flow_name, "Replacing registered flow.");
    }
    info!(flow = %flow_name, context_type = type_name::<TData>(), "Flow registered.");
  }

  pub fn is_registered<TData: 'static>(&self) -> bool {
    self.flows.read().contains_key(&TypeId::of::<TData>())
  }

  /// Runs the flow registered for `TData`.
  #[instrument(name = "FlowRegistry::run", skip_all, fields(context_type = type_name::<TData>()))]
  pub async fn run<TData>(&self, ctx_data: ContextData<TData>) -> Result<FlowOutcome, AppErr>
  where
    TData: 'static + Send + Sync,
  {
    let runner = self.flows.read().get(&TypeId::of::<TData>()).cloned();
    let runner = runner.ok_or_else(|| {
      <AppErr as From<FlowError>>::from(FlowError::FlowNotRegistered {
        context_type: type_name::<TData>().to_string(),
      })
    })?;
    runner.run_erased(Box::new(ctx_data)).await
  }
}

impl<AppErr> Default for FlowRegistry<AppErr>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}
