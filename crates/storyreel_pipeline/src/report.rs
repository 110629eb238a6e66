//! Public boundary reports.
//!
//! Pipeline entry points return these instead of propagating `Err`: any
//! whole-run failure is converted to a report with `status: "error"` after
//! the state file has been written.

use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

/// Outcome of [`crate::Pipeline::generate_content`].
#[derive(Debug, Clone, PartialEq, Serialize, derive_getters::Getters)]
pub struct GenerationReport {
    /// `"completed"` or `"error"`
    status: String,
    /// Directory-safe project identifier, empty when the run failed before
    /// the project directory was created
    project_slug: String,
    /// Human-readable project title
    project_title: String,
    /// Project directory
    output_dir: PathBuf,
    /// Final manifest payload; `Null` when the run failed
    manifest: Value,
    /// Number of segments the run worked through
    segments_processed: usize,
    /// Path of the state checkpoint
    state_file: PathBuf,
    /// Error message when `status` is `"error"`
    error: Option<String>,
}

impl GenerationReport {
    pub(crate) fn completed(
        project_slug: String,
        project_title: String,
        output_dir: PathBuf,
        manifest: Value,
        segments_processed: usize,
        state_file: PathBuf,
    ) -> Self {
        Self {
            status: "completed".to_string(),
            project_slug,
            project_title,
            output_dir,
            manifest,
            segments_processed,
            state_file,
            error: None,
        }
    }

    pub(crate) fn failed(
        project_slug: String,
        project_title: String,
        output_dir: PathBuf,
        state_file: PathBuf,
        error: String,
    ) -> Self {
        Self {
            status: "error".to_string(),
            project_slug,
            project_title,
            output_dir,
            manifest: Value::Null,
            segments_processed: 0,
            state_file,
            error: Some(error),
        }
    }

    /// Whether the run completed.
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}

/// Outcome of [`crate::Pipeline::resume_pipeline`].
#[derive(Debug, Clone, PartialEq, Serialize, derive_getters::Getters)]
pub struct ResumeReport {
    /// `"resumed"`, `"already_complete"`, or `"error"`
    status: String,
    /// Directory-safe project identifier
    project_slug: String,
    /// Segments retried in this invocation
    segments_retried: usize,
    /// Segments skipped because their retry budget was exhausted
    segments_skipped: usize,
    /// Segments completed after the resume
    completed_segments: usize,
    /// Segments still failed after the resume
    failed_segments: usize,
    /// Path of the state checkpoint
    state_file: PathBuf,
    /// Error message when `status` is `"error"`
    error: Option<String>,
}

impl ResumeReport {
    pub(crate) fn new(
        status: impl Into<String>,
        project_slug: String,
        segments_retried: usize,
        segments_skipped: usize,
        completed_segments: usize,
        failed_segments: usize,
        state_file: PathBuf,
    ) -> Self {
        Self {
            status: status.into(),
            project_slug,
            segments_retried,
            segments_skipped,
            completed_segments,
            failed_segments,
            state_file,
            error: None,
        }
    }

    pub(crate) fn failed(state_file: PathBuf, error: String) -> Self {
        Self {
            status: "error".to_string(),
            project_slug: String::new(),
            segments_retried: 0,
            segments_skipped: 0,
            completed_segments: 0,
            failed_segments: 0,
            state_file,
            error: Some(error),
        }
    }
}
