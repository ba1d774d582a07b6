// kiosk-core/src/flow/mod.rs

//! A small async step-flow engine.
//!
//! A [`Flow`] is an ordered list of named steps. Each step carries `before`,
//! `on` and `after` handler lists that run against a shared [`ContextData`].
//! A [`FlowRegistry`] keys flows by their context type so callers only hand
//! over the context.

pub mod context_data;
pub mod control;
pub mod pipeline;
pub mod registry;
pub mod step;

pub use context_data::ContextData;
pub use control::{FlowControl, FlowOutcome};
pub use pipeline::{Flow, Handler};
pub use registry::FlowRegistry;
pub use step::StepDef;
