//! Core data types for the Storyreel content pipeline.
//!
//! This crate provides the foundation value types used across the workspace:
//! segments, status enums, agent results, and run configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod result;
mod segment;
mod status;
mod style;

pub use config::{WorkflowConfig, WorkflowConfigBuilder};
pub use result::AgentResult;
pub use segment::Segment;
pub use status::{AgentStatus, PipelineStatus, SegmentStatus, WorkflowStatus};
pub use style::StylePreset;
