//! Stateful pipeline director.
//!
//! Drives the full topic-to-manifest sequence (transcript, segmentation,
//! per-segment prompts, per-segment images, manifest), checkpointing a
//! [`PipelineState`] to disk after every step so an interrupted run can be
//! resumed from its last checkpoint with [`Pipeline::resume_pipeline`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod pipeline;
mod report;
mod state;
mod store;

pub use pipeline::Pipeline;
pub use report::{GenerationReport, ResumeReport};
pub use state::{PipelineState, SegmentState, STATE_SCHEMA_VERSION};
pub use store::StateStore;
