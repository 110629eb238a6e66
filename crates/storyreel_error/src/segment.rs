//! Segmentation error types.

/// Specific error conditions for script segmentation.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum SegmentErrorKind {
    /// Target segment count must be strictly positive
    #[display("target_segments must be positive, got {}", _0)]
    TargetCount(i32),
    /// Target per-segment duration must be strictly positive
    #[display("target_duration must be positive, got {}", _0)]
    TargetDuration(f64),
}

/// Error type for segmentation operations.
///
/// # Examples
///
/// ```
/// use storyreel_error::{SegmentError, SegmentErrorKind};
///
/// let err = SegmentError::new(SegmentErrorKind::TargetCount(-1));
/// assert!(format!("{}", err).contains("positive"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Segmentation Error: {} at line {} in {}", kind, line, file)]
pub struct SegmentError {
    /// The specific error condition
    pub kind: SegmentErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl SegmentError {
    /// Create a new SegmentError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SegmentErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
