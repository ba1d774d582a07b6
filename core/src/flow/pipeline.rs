// kiosk-core/src/flow/pipeline.rs

//! `Flow<TData, Err>`: step definitions, handler registration and `run`.

use super::{ContextData, FlowControl, FlowOutcome, StepDef};
use crate::error::FlowError;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, error, info, info_span, Instrument};

/// A boxed step handler. It owns a clone of the run's context and resolves to
/// the control signal for the rest of the run.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<FlowControl, Err>> + Send>>
    + Send
    + Sync,
>;

#[derive(Debug, Clone, Copy)]
enum Phase {
  Before,
  On,
  After,
}

impl Phase {
  fn as_str(self) -> &'static str {
    match self {
      Phase::Before => "before",
      Phase::On => "on",
      Phase::After => "after",
    }
  }
}

pub struct Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  name: String,
  steps: Vec<StepDef>,
  before: HashMap<String, Vec<Handler<TData, Err>>>,
  on: HashMap<String, Vec<Handler<TData, Err>>>,
  after: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Creates a flow from `(step_name, optional)` pairs, in execution order.
  pub fn new(name: impl Into<String>, step_defs: &[(&str, bool)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|&(step_name, optional)| {
        if optional {
          StepDef::optional(step_name)
        } else {
          StepDef::required(step_name)
        }
      })
      .collect();

    Self {
      name: name.into(),
      steps,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn steps(&self) -> &[StepDef] {
    &self.steps
  }

  pub fn before<F, Fut, E>(&mut self, step_name: &str, handler_fn: F)
  where
    F: Fn(ContextData<TData>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<FlowControl, E>> + Send + 'static,
    E: Into<Err> + Send + 'static,
  {
    self.push_handler(Phase::Before, step_name, box_handler(handler_fn));
  }

  pub fn on<F, Fut, E>(&mut self, step_name: &str, handler_fn: F)
  where
    F: Fn(ContextData<TData>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<FlowControl, E>> + Send + 'static,
    E: Into<Err> + Send + 'static,
  {
    self.push_handler(Phase::On, step_name, box_handler(handler_fn));
  }

  pub fn after<F, Fut, E>(&mut self, step_name: &str, handler_fn: F)
  where
    F: Fn(ContextData<TData>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<FlowControl, E>> + Send + 'static,
    E: Into<Err> + Send + 'static,
  {
    self.push_handler(Phase::After, step_name, box_handler(handler_fn));
  }

  fn push_handler(&mut self, phase: Phase, step_name: &str, handler: Handler<TData, Err>) {
    // A typo in a step name is a wiring bug, not a runtime condition.
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!("flow '{}' has no step named '{}'", self.name, step_name);
    }
    let table = match phase {
      Phase::Before => &mut self.before,
      Phase::On => &mut self.on,
      Phase::After => &mut self.after,
    };
    table.entry(step_name.to_string()).or_default().push(handler);
  }

  fn handler_count(&self, step_name: &str) -> usize {
    [&self.before, &self.on, &self.after]
      .iter()
      .map(|table| table.get(step_name).map_or(0, Vec::len))
      .sum()
  }

  /// Runs every step in order against `ctx_data`.
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<FlowOutcome, Err> {
    debug!(flow = %self.name, num_steps = self.steps.len(), "Flow run starting.");

    for (step_index, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();

      if self.handler_count(step_name) == 0 {
        if step_def.optional {
          debug!(flow = %self.name, step = step_name, "Optional step has no handlers, skipping.");
          continue;
        }
        error!(flow = %self.name, step = step_name, "Required step has no handlers.");
        return Err(Err::from(FlowError::HandlerMissing {
          flow: self.name.clone(),
          step_name: step_def.name.clone(),
        }));
      }

      let span = info_span!("flow_step", flow = %self.name, step = step_name, step_index);
      match self.run_step(step_name, ctx_data.clone()).instrument(span).await? {
        FlowControl::Continue => {}
        FlowControl::Stop => {
          info!(flow = %self.name, step = step_name, "Flow stopped by a handler.");
          return Ok(FlowOutcome::Stopped);
        }
      }
    }

    debug!(flow = %self.name, "Flow run completed.");
    Ok(FlowOutcome::Completed)
  }

  async fn run_step(&self, step_name: &str, ctx_data: ContextData<TData>) -> Result<FlowControl, Err> {
    let phases = [
      (Phase::Before, &self.before),
      (Phase::On, &self.on),
      (Phase::After, &self.after),
    ];
    for (phase, table) in phases {
      let Some(handlers) = table.get(step_name) else {
        continue;
      };
      for handler in handlers {
        match handler(ctx_data.clone()).await {
          Ok(FlowControl::Continue) => {}
          Ok(FlowControl::Stop) => {
            debug!(phase = phase.as_str(), "Handler requested stop.");
            return Ok(FlowControl::Stop);
          }
          Err(e) => {
            error!(phase = phase.as_str(), error = %e, "Handler failed.");
            return Err(e);
          }
        }
      }
    }
    Ok(FlowControl::Continue)
  }
}

fn box_handler<TData, Err, F, Fut, E>(handler_fn: F) -> Handler<TData, Err>
where
  TData: 'static + Send + Sync,
  F: Fn(ContextData<TData>) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<FlowControl, E>> + Send + 'static,
  E: Into<Err> + Send + 'static,
  Err: 'static,
{
  Box::new(move |ctx_data| {
    let fut = handler_fn(ctx_data);
    Box::pin(async move { fut.await.map_err(Into::into) })
  })
}
