//! Prompt generation agent.

use crate::{EnhancementConfig, PromptEnhancer};
use async_trait::async_trait;
use serde_json::{json, Value};
use storyreel_core::{AgentResult, AgentStatus, Segment, WorkflowConfig};
use storyreel_interface::Agent;
use tracing::{debug, info};

const TOOLS: [&str; 3] = ["prompt_enhancer", "style_library", "keyword_cleaner"];

/// Produces one enhanced image prompt per segment. Depends on the
/// segmenter agent's output.
#[derive(Debug)]
pub struct PromptGenAgent {
    status: AgentStatus,
    enhancer: PromptEnhancer,
}

impl PromptGenAgent {
    /// Create a prompt-generation agent.
    pub fn new() -> Self {
        Self {
            status: AgentStatus::Idle,
            enhancer: PromptEnhancer::new(),
        }
    }

    /// Basic scene description derived from segment text. Long segments are
    /// trimmed to their first two sentences so the prompt stays focused.
    fn basic_prompt(text: &str) -> String {
        let description = if text.len() > 200 {
            let mut sentences = Vec::new();
            let mut start = 0;
            for (i, c) in text.char_indices() {
                if matches!(c, '.' | '!' | '?') {
                    sentences.push(text[start..=i].trim());
                    start = i + c.len_utf8();
                    if sentences.len() == 2 {
                        break;
                    }
                }
            }
            if sentences.is_empty() {
                text.trim().to_string()
            } else {
                sentences.join(" ")
            }
        } else {
            text.trim().to_string()
        };
        format!("Scene depicting: {description}")
    }
}

impl Default for PromptGenAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for PromptGenAgent {
    fn name(&self) -> &str {
        "PromptGenAgent"
    }

    fn role(&self) -> &str {
        "Visual Prompt Engineer"
    }

    fn goal(&self) -> &str {
        "Craft detailed image-generation prompts for every segment"
    }

    fn backstory(&self) -> &str {
        "A prompt specialist who translates narrative beats into vivid, \
         style-consistent visual descriptions"
    }

    fn tools(&self) -> &[&'static str] {
        &TOOLS
    }

    fn status(&self) -> AgentStatus {
        self.status
    }

    fn validate_input(&self, input: &Value) -> bool {
        input
            .get("segments")
            .and_then(Value::as_array)
            .is_some_and(|a| !a.is_empty())
    }

    async fn execute(&mut self, input: Value, config: &WorkflowConfig) -> AgentResult {
        self.status = AgentStatus::Running;

        let Some(raw) = input.get("segments").cloned() else {
            self.status = AgentStatus::Failed;
            return AgentResult::failed(self.name(), "no segments to generate prompts for");
        };
        let segments: Vec<Segment> = match serde_json::from_value(raw) {
            Ok(segments) => segments,
            Err(e) => {
                self.status = AgentStatus::Failed;
                return AgentResult::failed(self.name(), format!("malformed segments: {e}"));
            }
        };
        if segments.is_empty() {
            self.status = AgentStatus::Failed;
            return AgentResult::failed(self.name(), "no segments to generate prompts for");
        }

        let preset = *config.style_preset();
        let enhancement = EnhancementConfig::standard();
        let mut prompts = Vec::with_capacity(segments.len());
        for segment in &segments {
            let basic = Self::basic_prompt(segment.text());
            let enhanced = self.enhancer.enhance_with(&basic, preset, &enhancement);
            debug!(index = segment.index(), chars = enhanced.len(), "prompt built");
            prompts.push(json!({
                "segment_index": segment.index(),
                "basic_prompt": basic,
                "enhanced_prompt": enhanced,
                "style_preset": preset,
                "segment_duration": segment.duration(),
            }));
        }
        info!(prompts = prompts.len(), preset = %preset, "prompt generation complete");

        self.status = AgentStatus::Completed;
        AgentResult::completed(
            self.name(),
            json!({
                "enhanced_prompts": prompts,
                "prompt_count": prompts.len(),
                "style_preset": preset,
            }),
        )
    }
}
