//! Script segment value type.

use serde::{Deserialize, Serialize};

/// A single timed chunk of script text.
///
/// Segments are produced only by the segmenter and never mutated afterwards.
/// Indices are 1-based; `[start_time, end_time)` intervals are contiguous and
/// non-overlapping across a segmentation result.
///
/// # Examples
///
/// ```
/// use storyreel_core::Segment;
///
/// let segment = Segment::new(1, "A quiet street at dawn.".to_string(), 2.0, 5, 0.0, 2.0);
/// assert_eq!(*segment.index(), 1);
/// assert_eq!(*segment.word_count(), 5);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_new::new,
)]
pub struct Segment {
    /// 1-based position in the segmentation result
    index: usize,
    /// Segment text
    text: String,
    /// Estimated speaking duration in seconds
    duration: f64,
    /// Number of whitespace-separated words
    word_count: usize,
    /// Cumulative start time in seconds
    start_time: f64,
    /// Cumulative end time in seconds
    end_time: f64,
}
