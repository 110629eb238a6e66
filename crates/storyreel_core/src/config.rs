//! Run configuration.

use crate::StylePreset;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Immutable run parameters for a workflow or pipeline execution.
///
/// `target_segments` is signed so that invalid values remain representable;
/// validation (`Crew::validate_workflow`, `Segmenter::new`) rejects
/// non-positive counts before any collaborator is invoked.
///
/// # Examples
///
/// ```
/// use storyreel_core::{StylePreset, WorkflowConfig};
///
/// let config = WorkflowConfig::builder()
///     .target_segments(5)
///     .style_preset(StylePreset::GoldenHour)
///     .build()
///     .unwrap();
/// assert_eq!(*config.target_segments(), 5);
/// assert_eq!(*config.target_duration(), 8.0);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct WorkflowConfig {
    /// Exact number of segments the segmenter must produce
    #[builder(default = "10")]
    target_segments: i32,
    /// Target per-segment duration in seconds
    #[builder(default = "8.0")]
    target_duration: f64,
    /// Styling preset for prompt enhancement
    #[builder(default)]
    style_preset: StylePreset,
    /// Root directory for generated artifacts
    #[builder(default = "PathBuf::from(\"./output\")")]
    output_dir: PathBuf,
    /// Requested image dimensions, e.g. "1024x1024"
    #[builder(default = "String::from(\"1024x1024\")")]
    image_size: String,
    /// Retry ceiling per segment during resume
    #[builder(default = "3")]
    max_retries: u32,
    /// Collaborator timeout hint in seconds
    #[builder(default = "300")]
    timeout_seconds: u64,
}

impl WorkflowConfig {
    /// Start building a configuration.
    pub fn builder() -> WorkflowConfigBuilder {
        WorkflowConfigBuilder::default()
    }

    /// Copy of this configuration with a different output directory.
    ///
    /// The pipeline uses this to point the image-render agent at a
    /// per-segment subdirectory.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        WorkflowConfigBuilder::default()
            .build()
            .expect("all fields have defaults")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = WorkflowConfig::default();
        assert_eq!(*config.target_segments(), 10);
        assert_eq!(*config.target_duration(), 8.0);
        assert_eq!(*config.style_preset(), StylePreset::Cinematic4k);
        assert_eq!(*config.max_retries(), 3);
        assert_eq!(config.image_size(), "1024x1024");
    }

    #[test]
    fn invalid_counts_are_representable() {
        // Validation rejects these later; construction must not panic.
        let config = WorkflowConfig::builder()
            .target_segments(-1)
            .build()
            .unwrap();
        assert_eq!(*config.target_segments(), -1);
    }

    #[test]
    fn with_output_dir_replaces_only_the_directory() {
        let config = WorkflowConfig::default().with_output_dir("/tmp/project/segment_01");
        assert_eq!(config.output_dir(), &PathBuf::from("/tmp/project/segment_01"));
        assert_eq!(*config.target_segments(), 10);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = WorkflowConfig::builder()
            .target_segments(4)
            .style_preset(StylePreset::Vintage)
            .build()
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let back: WorkflowConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
