//! Storyreel - Stateful Media Content-Generation Pipeline
//!
//! Storyreel turns a topic string into a multi-segment media project:
//! transcript, timed segments, per-segment image prompts, per-segment
//! images, and a final manifest. Progress is checkpointed to disk after
//! every step, so an interrupted run resumes without redoing completed work.
//!
//! # Features
//!
//! - **Exact-count segmentation**: deterministic partitioning of arbitrary
//!   text into the requested number of near-uniform-duration segments
//! - **Agent workflow**: four focused agents executed in dependency order
//!   with fail-fast semantics
//! - **Checkpoint & resume**: full pipeline state persisted as JSON;
//!   per-segment retries with a configurable budget
//! - **Pluggable collaborators**: text and image generation behind the
//!   `TextGenerator`/`ImageRenderer` traits; tests run on stubs
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use std::sync::Arc;
//! use storyreel::{AgentRegistry, Pipeline};
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = AgentRegistry::new(my_text_backend(), my_image_backend());
//!     let pipeline = Pipeline::new(registry)
//!         .with_progress(|message: &str, percent: f32| {
//!             println!("[{percent:>5.1}%] {message}");
//!         });
//!     let report = pipeline
//!         .generate_content("ocean tides", "educational", Path::new("./output"), None, None)
//!         .await;
//!     println!("{}: {}", report.status(), report.project_slug());
//! }
//! ```
//!
//! # Architecture
//!
//! Storyreel is organized as a workspace with focused crates:
//!
//! - `storyreel_error` - Error taxonomy and `StoryreelResult`
//! - `storyreel_core` - Value types: segments, statuses, results, config
//! - `storyreel_interface` - Collaborator and agent traits
//! - `storyreel_segment` - The segmentation algorithm
//! - `storyreel_agent` - Concrete agents, prompt enhancer, registry
//! - `storyreel_crew` - Dependency-ordered workflow orchestration
//! - `storyreel_pipeline` - Stateful pipeline director with resume
//!
//! This crate (`storyreel`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use storyreel_agent::{
    template, AgentRegistry, EnhancementConfig, ImageRenderAgent, PromptEnhancer, PromptGenAgent,
    ScriptAgent, SegmenterAgent, StyleTemplate, AGENT_ROLES,
};
pub use storyreel_core::{
    AgentResult, AgentStatus, PipelineStatus, Segment, SegmentStatus, StylePreset, WorkflowConfig,
    WorkflowStatus,
};
pub use storyreel_crew::{Crew, TracingObserver, WorkflowObserver, WorkflowResult};
pub use storyreel_error::{
    AgentError, AgentErrorKind, ConfigError, JsonError, PipelineError, PipelineErrorKind,
    SegmentError, SegmentErrorKind, StorageError, StorageErrorKind, StoryreelError,
    StoryreelErrorKind, StoryreelResult,
};
pub use storyreel_interface::{
    Agent, AgentInfo, ImageRenderer, ProgressSink, TextGenerator,
};
pub use storyreel_pipeline::{
    GenerationReport, Pipeline, PipelineState, ResumeReport, SegmentState, StateStore,
    STATE_SCHEMA_VERSION,
};
pub use storyreel_segment::{segment_script, Segmenter, WORDS_PER_SECOND};
