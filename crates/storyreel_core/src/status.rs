//! Status enums for agents, segments, workflows, and pipeline runs.
//!
//! All status fields are closed sum types serialized as snake_case strings;
//! unknown values fail deserialization rather than reconstructing
//! best-effort.

use serde::{Deserialize, Serialize};

/// Agent execution status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// Not yet started
    #[display("idle")]
    Idle,
    /// Currently executing
    #[display("running")]
    Running,
    /// Finished successfully
    #[display("completed")]
    Completed,
    /// Finished with an error
    #[display("failed")]
    Failed,
}

/// Processing status of an individual segment.
///
/// Advances monotonically through the stage sequence except when a retry
/// explicitly resets it. `Failed` is terminal unless a retry succeeds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum SegmentStatus {
    /// No work done yet (retry reset lands here)
    #[display("pending")]
    Pending,
    /// Script content attached
    #[display("script_generated")]
    ScriptGenerated,
    /// Seeded from the segmenter output
    #[display("segmented")]
    Segmented,
    /// Enhanced prompts written
    #[display("prompts_generated")]
    PromptsGenerated,
    /// Image artifacts rendered
    #[display("images_rendered")]
    ImagesRendered,
    /// All stages done
    #[display("completed")]
    Completed,
    /// A stage failed for this segment
    #[display("failed")]
    Failed,
}

/// Overall pipeline run status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    /// Created but not started
    #[display("pending")]
    Pending,
    /// Executing stages
    #[display("running")]
    Running,
    /// Finished; every segment is completed or counted as failed
    #[display("completed")]
    Completed,
    /// A fatal stage failed
    #[display("failed")]
    Failed,
    /// Suspended by the operator
    #[display("paused")]
    Paused,
}

/// Crew workflow execution status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    /// Created but not started
    #[display("pending")]
    Pending,
    /// Executing agents
    #[display("running")]
    Running,
    /// All agents completed
    #[display("completed")]
    Completed,
    /// An agent failed and the workflow aborted
    #[display("failed")]
    Failed,
    /// Cancelled before completion
    #[display("cancelled")]
    Cancelled,
}
