//! Trait definitions for the Storyreel content pipeline.
//!
//! This crate provides the collaborator driver traits, the agent contract,
//! and the progress reporting extension point.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod agent;
mod progress;
mod traits;

pub use agent::{Agent, AgentInfo};
pub use progress::ProgressSink;
pub use traits::{ImageRenderer, TextGenerator};
