// kiosk-core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Errors raised by the flow engine itself, as opposed to by handlers.
#[derive(Debug, Error)]
pub enum FlowError {
  #[error("Handler missing for required step '{step_name}' in flow '{flow}'")]
  HandlerMissing { flow: String, step_name: String },

  #[error("No flow registered for context type {context_type}")]
  FlowNotRegistered { context_type: String },

  #[error("Context type mismatch in flow '{flow}' (expected {expected_type})")]
  TypeMismatch { flow: String, expected_type: String },

  #[error("Error in handler or external operation. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },
}

impl From<AnyhowError> for FlowError {
  fn from(err: AnyhowError) -> Self {
    FlowError::HandlerError { source: err }
  }
}

pub type FlowResult<T, E = FlowError> = std::result::Result<T, E>;
