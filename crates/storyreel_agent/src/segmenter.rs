//! Segmentation agent wrapping the core segmenter.

use async_trait::async_trait;
use serde_json::{json, Value};
use storyreel_core::{AgentResult, AgentStatus, WorkflowConfig};
use storyreel_interface::Agent;
use storyreel_segment::Segmenter;
use tracing::{info, warn};

const TOOLS: [&str; 3] = ["text_segmenter", "duration_estimator", "boundary_validator"];

/// Splits a processed script into exactly the configured number of timed
/// segments. Depends on the script agent's output.
#[derive(Debug)]
pub struct SegmenterAgent {
    status: AgentStatus,
}

impl Default for SegmenterAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmenterAgent {
    /// Create a segmenter agent.
    pub fn new() -> Self {
        Self {
            status: AgentStatus::Idle,
        }
    }

    /// Accepts either the script agent's output object or a bare string.
    fn extract_script(input: &Value) -> Option<&str> {
        input
            .get("processed_script")
            .and_then(Value::as_str)
            .or_else(|| input.as_str())
    }
}

#[async_trait]
impl Agent for SegmenterAgent {
    fn name(&self) -> &str {
        "SegmenterAgent"
    }

    fn role(&self) -> &str {
        "Content Segmentation Specialist"
    }

    fn goal(&self) -> &str {
        "Divide script content into precisely timed segments"
    }

    fn backstory(&self) -> &str {
        "A pacing expert who breaks narratives at natural boundaries while \
         keeping every segment close to its target duration"
    }

    fn tools(&self) -> &[&'static str] {
        &TOOLS
    }

    fn status(&self) -> AgentStatus {
        self.status
    }

    fn validate_input(&self, input: &Value) -> bool {
        Self::extract_script(input).is_some_and(|s| !s.trim().is_empty())
    }

    async fn execute(&mut self, input: Value, config: &WorkflowConfig) -> AgentResult {
        self.status = AgentStatus::Running;

        let Some(script) = Self::extract_script(&input) else {
            self.status = AgentStatus::Failed;
            return AgentResult::failed(self.name(), "no script content to segment");
        };
        if script.trim().is_empty() {
            self.status = AgentStatus::Failed;
            return AgentResult::failed(self.name(), "no script content to segment");
        }

        let segmenter = match Segmenter::new(*config.target_segments(), *config.target_duration())
        {
            Ok(segmenter) => segmenter,
            Err(e) => {
                self.status = AgentStatus::Failed;
                return AgentResult::failed(self.name(), format!("invalid segmentation config: {e}"));
            }
        };

        let segments = segmenter.segment(script);
        let issues = segmenter.validate(&segments);
        for issue in &issues {
            warn!(issue = %issue, "segmentation diagnostic");
        }

        let total_duration: f64 = segments.iter().map(|s| s.duration()).sum();
        info!(
            segments = segments.len(),
            total_duration, "segmentation complete"
        );

        let segments_json = match serde_json::to_value(&segments) {
            Ok(value) => value,
            Err(e) => {
                self.status = AgentStatus::Failed;
                return AgentResult::failed(self.name(), format!("segment serialization failed: {e}"));
            }
        };
        let metadata = [(
            "validation_issues".to_string(),
            json!(issues),
        )]
        .into_iter()
        .collect();

        self.status = AgentStatus::Completed;
        AgentResult::completed_with(
            self.name(),
            json!({
                "segments": segments_json,
                "segment_count": segments.len(),
                "total_duration": total_duration,
            }),
            metadata,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyreel_core::WorkflowConfig;

    fn config(target: i32) -> WorkflowConfig {
        WorkflowConfig::builder()
            .target_segments(target)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn segments_the_processed_script_to_the_target_count() {
        let mut agent = SegmenterAgent::new();
        let input = json!({
            "processed_script": "The tide rises slowly over the flats. Birds gather \
                 along the waterline in the early light. A fisherman checks his nets \
                 one more time. The first boat leaves the harbor before dawn.",
        });
        let result = agent.execute(input, &config(3)).await;

        assert!(result.is_completed());
        assert_eq!(result.data()["segment_count"], json!(3));
        let segments = result.data()["segments"].as_array().unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0]["index"], json!(1));
    }

    #[tokio::test]
    async fn accepts_a_bare_string_input() {
        let mut agent = SegmenterAgent::new();
        let result = agent
            .execute(json!("One sentence. Another sentence."), &config(2))
            .await;
        assert!(result.is_completed());
        assert_eq!(result.data()["segment_count"], json!(2));
    }

    #[tokio::test]
    async fn missing_script_fails_the_agent() {
        let mut agent = SegmenterAgent::new();
        let result = agent.execute(json!({"other": 1}), &config(2)).await;
        assert!(!result.is_completed());
        assert_eq!(agent.status(), AgentStatus::Failed);
    }

    #[tokio::test]
    async fn invalid_target_count_fails_without_panicking() {
        let mut agent = SegmenterAgent::new();
        let result = agent.execute(json!("Some text here."), &config(-1)).await;
        assert!(!result.is_completed());
        assert!(result
            .error()
            .as_deref()
            .unwrap()
            .contains("invalid segmentation config"));
    }
}
