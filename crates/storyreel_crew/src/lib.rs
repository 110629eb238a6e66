//! Dependency-ordered workflow orchestration.
//!
//! A [`Crew`] owns a set of agent roles and a dependency graph between
//! them. Execution order is resolved once, at construction; [`Crew::execute`]
//! then runs the agents sequentially, feeding each successful output to the
//! next stage and stopping at the first failure.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod crew;
mod observer;
mod result;

pub use crew::Crew;
pub use observer::{TracingObserver, WorkflowObserver};
pub use result::WorkflowResult;
