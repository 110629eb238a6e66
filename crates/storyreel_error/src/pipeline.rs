//! Pipeline error types.

/// Specific error conditions for pipeline execution.
///
/// Failures in the transcript and segmentation stages are fatal to the run:
/// no segments exist yet, so there is nothing to isolate.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Transcript generation (stage 1) failed
    #[display("Transcript generation failed: {}", _0)]
    Transcript(String),
    /// Script segmentation (stage 2) failed
    #[display("Segmentation failed: {}", _0)]
    Segmentation(String),
    /// Workflow validation rejected the run before any collaborator call
    #[display("Workflow validation failed: {}", _0)]
    Validation(String),
    /// Resuming from a state file failed
    #[display("Pipeline resume failed: {}", _0)]
    Resume(String),
}

/// Error type for pipeline operations.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
