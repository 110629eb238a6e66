//! Persistent pipeline state.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use storyreel_core::{PipelineStatus, SegmentStatus, WorkflowConfig};

/// Schema version written into every state file and checked on load.
pub const STATE_SCHEMA_VERSION: u32 = 1;

/// Mutable per-segment progress record.
///
/// Keyed in [`PipelineState`] by a zero-padded id (`segment_01`, ...) so the
/// map iterates in index order. Status advances monotonically except for the
/// explicit retry reset in [`SegmentState::begin_retry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct SegmentState {
    /// Zero-padded segment id
    segment_id: String,
    /// Current stage this segment has reached
    status: SegmentStatus,
    /// Segment text from the segmenter
    script_content: String,
    /// Enhanced image prompts, present once prompts are generated
    enhanced_prompts: Vec<String>,
    /// Rendered image paths, present once images are rendered
    image_paths: Vec<PathBuf>,
    /// Error from the most recent failed attempt
    error_message: Option<String>,
    /// Attempts consumed by resume retries
    retry_count: u32,
    /// RFC 3339 timestamp of the last mutation
    last_updated: String,
}

impl SegmentState {
    /// Fresh record for a segment that has just been produced by the
    /// segmenter.
    pub fn new(segment_id: impl Into<String>, script_content: impl Into<String>) -> Self {
        Self {
            segment_id: segment_id.into(),
            status: SegmentStatus::Segmented,
            script_content: script_content.into(),
            enhanced_prompts: Vec::new(),
            image_paths: Vec::new(),
            error_message: None,
            retry_count: 0,
            last_updated: Utc::now().to_rfc3339(),
        }
    }

    fn touch(&mut self) {
        self.last_updated = Utc::now().to_rfc3339();
    }

    /// Record generated prompts and advance to `PromptsGenerated`.
    pub fn mark_prompts(&mut self, prompts: Vec<String>) {
        self.enhanced_prompts = prompts;
        self.status = SegmentStatus::PromptsGenerated;
        self.error_message = None;
        self.touch();
    }

    /// Record rendered images and advance to `Completed`.
    pub fn mark_completed(&mut self, image_paths: Vec<PathBuf>) {
        self.image_paths = image_paths;
        self.status = SegmentStatus::Completed;
        self.error_message = None;
        self.touch();
    }

    /// Record a failure. Terminal unless a retry succeeds.
    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = SegmentStatus::Failed;
        self.error_message = Some(error.into());
        self.touch();
    }

    /// Consume one retry attempt and clear the previous error.
    pub fn begin_retry(&mut self) {
        self.retry_count += 1;
        self.error_message = None;
        self.touch();
    }

    /// Whether this segment still needs work.
    pub fn is_pending(&self) -> bool {
        self.status != SegmentStatus::Completed
    }
}

/// Root aggregate persisted as `state.json`.
///
/// The segment map is a `BTreeMap` so iteration follows the zero-padded ids,
/// which is index order. The rollup counters are recomputed from the map
/// after every mutation and can never drift from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct PipelineState {
    /// State file schema version
    schema_version: u32,
    /// Directory-safe project identifier
    project_slug: String,
    /// Topic the run was started with
    topic: String,
    /// Free-form content category, e.g. "educational"
    video_type: String,
    /// Project directory all artifacts live under
    output_dir: PathBuf,
    /// Overall run status
    status: PipelineStatus,
    /// Per-segment progress, keyed by zero-padded id
    segments: BTreeMap<String, SegmentState>,
    /// Run configuration, persisted so resume uses the original parameters
    config: WorkflowConfig,
    /// RFC 3339 creation timestamp
    created_at: String,
    /// RFC 3339 timestamp of the last mutation
    updated_at: String,
    /// Rollup: total segments
    total_segments: usize,
    /// Rollup: segments in `Completed`
    completed_segments: usize,
    /// Rollup: segments in `Failed`
    failed_segments: usize,
}

impl PipelineState {
    /// Fresh state for a new run.
    pub fn new(
        project_slug: impl Into<String>,
        topic: impl Into<String>,
        video_type: impl Into<String>,
        output_dir: impl Into<PathBuf>,
        config: WorkflowConfig,
    ) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            schema_version: STATE_SCHEMA_VERSION,
            project_slug: project_slug.into(),
            topic: topic.into(),
            video_type: video_type.into(),
            output_dir: output_dir.into(),
            status: PipelineStatus::Pending,
            segments: BTreeMap::new(),
            config,
            created_at: now.clone(),
            updated_at: now,
            total_segments: 0,
            completed_segments: 0,
            failed_segments: 0,
        }
    }

    fn refresh(&mut self) {
        self.total_segments = self.segments.len();
        self.completed_segments = self
            .segments
            .values()
            .filter(|s| *s.status() == SegmentStatus::Completed)
            .count();
        self.failed_segments = self
            .segments
            .values()
            .filter(|s| *s.status() == SegmentStatus::Failed)
            .count();
        self.updated_at = Utc::now().to_rfc3339();
    }

    /// Set the overall run status.
    pub fn set_status(&mut self, status: PipelineStatus) {
        self.status = status;
        self.refresh();
    }

    /// Register a new segment record.
    pub fn insert_segment(&mut self, segment: SegmentState) {
        self.segments.insert(segment.segment_id().clone(), segment);
        self.refresh();
    }

    /// Mutate one segment record; the rollup counters are recomputed
    /// afterwards.
    pub fn update_segment(&mut self, segment_id: &str, f: impl FnOnce(&mut SegmentState)) {
        if let Some(segment) = self.segments.get_mut(segment_id) {
            f(segment);
        }
        self.refresh();
    }

    /// Ids of segments that are not yet `Completed`, in index order.
    pub fn pending_segment_ids(&self) -> Vec<String> {
        self.segments
            .values()
            .filter(|s| s.is_pending())
            .map(|s| s.segment_id().clone())
            .collect()
    }

    /// Whether every segment reached `Completed`.
    pub fn all_segments_completed(&self) -> bool {
        !self.segments.is_empty() && self.completed_segments == self.total_segments
    }
}
