//! Deterministic script segmentation.
//!
//! Partitions arbitrary script text into an exact target number of
//! near-uniform-duration segments: clean, split into sentences, group
//! greedily at the speaking-rate estimate, then reconcile to the exact
//! count by splitting the longest segments or merging the cheapest
//! adjacent pairs.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod segmenter;

pub use segmenter::{segment_script, Segmenter, WORDS_PER_SECOND};
