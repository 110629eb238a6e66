//! Script generation and preprocessing agent.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use storyreel_core::{AgentResult, AgentStatus, WorkflowConfig};
use storyreel_interface::{Agent, TextGenerator};
use tracing::{error, info};

const TOOLS: [&str; 4] = [
    "text_analyzer",
    "scene_detector",
    "dialogue_extractor",
    "visual_element_identifier",
];

/// Generates the transcript via the text collaborator and preprocesses it
/// for segmentation. First stage of the workflow; no upstream dependency.
pub struct ScriptAgent {
    status: AgentStatus,
    text: Arc<dyn TextGenerator>,
}

impl ScriptAgent {
    /// Create a script agent backed by the given text collaborator.
    pub fn new(text: Arc<dyn TextGenerator>) -> Self {
        Self {
            status: AgentStatus::Idle,
            text,
        }
    }

    /// Lightweight structural analysis of the generated script.
    fn analyze(script: &str) -> Value {
        let lines: Vec<&str> = script.lines().collect();
        let scenes: Vec<&str> = lines
            .iter()
            .map(|l| l.trim())
            .filter(|l| {
                l.starts_with("SCENE") || l.starts_with("INT.") || l.starts_with("EXT.")
            })
            .collect();
        let word_count = script.split_whitespace().count();
        json!({
            "total_lines": lines.len(),
            "scene_count": scenes.len(),
            "estimated_duration": word_count as f64 / 2.5,
            "has_dialogue": script.contains(':') || script.contains('"'),
            "scenes": scenes.iter().take(5).collect::<Vec<_>>(),
        })
    }

    /// Normalize line endings and drop blank lines.
    fn preprocess(script: &str) -> String {
        script
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl Agent for ScriptAgent {
    fn name(&self) -> &str {
        "ScriptAgent"
    }

    fn role(&self) -> &str {
        "Script Analyst and Preprocessor"
    }

    fn goal(&self) -> &str {
        "Generate and preprocess script content for optimal segmentation"
    }

    fn backstory(&self) -> &str {
        "An expert in narrative structure who identifies the scenes, dialogue, \
         and visual elements that translate well to a segmented format"
    }

    fn tools(&self) -> &[&'static str] {
        &TOOLS
    }

    fn status(&self) -> AgentStatus {
        self.status
    }

    fn validate_input(&self, input: &Value) -> bool {
        input.as_str().is_some_and(|s| !s.trim().is_empty())
    }

    async fn execute(&mut self, input: Value, _config: &WorkflowConfig) -> AgentResult {
        self.status = AgentStatus::Running;

        if !self.validate_input(&input) {
            self.status = AgentStatus::Failed;
            return AgentResult::failed(self.name(), "invalid script prompt");
        }
        let prompt = input.as_str().unwrap_or_default();
        info!(chars = prompt.len(), "generating script");

        let script = match self.text.generate(prompt).await {
            Ok(script) => script,
            Err(e) => {
                error!(error = %e, "script generation failed");
                self.status = AgentStatus::Failed;
                return AgentResult::failed(self.name(), format!("script generation failed: {e}"));
            }
        };

        let analysis = Self::analyze(&script);
        let processed = Self::preprocess(&script);
        let metadata = [
            ("character_count".to_string(), json!(script.len())),
            (
                "scene_count".to_string(),
                analysis.get("scene_count").cloned().unwrap_or(json!(0)),
            ),
        ]
        .into_iter()
        .collect();

        self.status = AgentStatus::Completed;
        AgentResult::completed_with(
            self.name(),
            json!({
                "original_script": script,
                "processed_script": processed,
                "analysis": analysis,
            }),
            metadata,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyreel_error::{AgentError, AgentErrorKind};

    struct EchoText;

    #[async_trait]
    impl TextGenerator for EchoText {
        async fn generate(&self, prompt: &str) -> storyreel_error::StoryreelResult<String> {
            Ok(format!("INT. STUDIO\r\nA narrator says: {prompt}\r\n\r\nThe end."))
        }

        fn provider_name(&self) -> &'static str {
            "stub"
        }

        fn model_name(&self) -> &str {
            "echo-v1"
        }
    }

    struct FailingText;

    #[async_trait]
    impl TextGenerator for FailingText {
        async fn generate(&self, _prompt: &str) -> storyreel_error::StoryreelResult<String> {
            Err(AgentError::new(AgentErrorKind::ExecutionFailed {
                agent: "stub".to_string(),
                message: "quota exhausted".to_string(),
            })
            .into())
        }

        fn provider_name(&self) -> &'static str {
            "stub"
        }

        fn model_name(&self) -> &str {
            "broken-v1"
        }
    }

    #[tokio::test]
    async fn generates_and_preprocesses_script() {
        let mut agent = ScriptAgent::new(Arc::new(EchoText));
        let config = WorkflowConfig::default();
        let result = agent
            .execute(json!("Generate a short script about: tides"), &config)
            .await;

        assert!(result.is_completed());
        assert_eq!(agent.status(), AgentStatus::Completed);
        let processed = result.data()["processed_script"].as_str().unwrap();
        assert!(!processed.contains('\r'));
        assert!(!processed.contains("\n\n"));
        assert_eq!(result.data()["analysis"]["scene_count"], json!(1));
    }

    #[tokio::test]
    async fn collaborator_failure_becomes_failed_result() {
        let mut agent = ScriptAgent::new(Arc::new(FailingText));
        let config = WorkflowConfig::default();
        let result = agent.execute(json!("topic"), &config).await;

        assert!(!result.is_completed());
        assert_eq!(agent.status(), AgentStatus::Failed);
        assert!(result.error().as_deref().unwrap().contains("quota exhausted"));
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected_without_a_collaborator_call() {
        let mut agent = ScriptAgent::new(Arc::new(FailingText));
        let config = WorkflowConfig::default();
        let result = agent.execute(json!("   "), &config).await;
        assert!(result.error().as_deref().unwrap().contains("invalid"));
    }
}
