//! Image rendering agent.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use storyreel_core::{AgentResult, AgentStatus, WorkflowConfig};
use storyreel_interface::{Agent, ImageRenderer};
use tracing::{error, info};

const TOOLS: [&str; 3] = ["image_renderer", "output_writer", "retry_scheduler"];

/// Renders one image per enhanced prompt through the image collaborator.
/// Depends on the prompt-generation agent's output.
///
/// Individual prompt failures are recorded per item; the agent itself only
/// fails when its input is unusable.
pub struct ImageRenderAgent {
    status: AgentStatus,
    renderer: Arc<dyn ImageRenderer>,
}

impl ImageRenderAgent {
    /// Create an image-render agent backed by the given renderer.
    pub fn new(renderer: Arc<dyn ImageRenderer>) -> Self {
        Self {
            status: AgentStatus::Idle,
            renderer,
        }
    }
}

#[async_trait]
impl Agent for ImageRenderAgent {
    fn name(&self) -> &str {
        "ImageRenderAgent"
    }

    fn role(&self) -> &str {
        "Image Production Specialist"
    }

    fn goal(&self) -> &str {
        "Render a still image for every segment prompt"
    }

    fn backstory(&self) -> &str {
        "A production artist who turns finished prompts into consistent \
         imagery and keeps the output directory organized"
    }

    fn tools(&self) -> &[&'static str] {
        &TOOLS
    }

    fn status(&self) -> AgentStatus {
        self.status
    }

    fn validate_input(&self, input: &Value) -> bool {
        input
            .get("enhanced_prompts")
            .and_then(Value::as_array)
            .is_some_and(|a| !a.is_empty())
    }

    async fn execute(&mut self, input: Value, config: &WorkflowConfig) -> AgentResult {
        self.status = AgentStatus::Running;

        let Some(prompts) = input.get("enhanced_prompts").and_then(Value::as_array) else {
            self.status = AgentStatus::Failed;
            return AgentResult::failed(self.name(), "no prompts to render");
        };
        if prompts.is_empty() {
            self.status = AgentStatus::Failed;
            return AgentResult::failed(self.name(), "no prompts to render");
        }

        let output_dir = config.output_dir().clone();
        if let Err(e) = std::fs::create_dir_all(&output_dir) {
            self.status = AgentStatus::Failed;
            return AgentResult::failed(
                self.name(),
                format!("cannot create output directory {}: {e}", output_dir.display()),
            );
        }

        let mut generated = Vec::with_capacity(prompts.len());
        let mut rendered = 0usize;
        for prompt in prompts {
            let index = prompt
                .get("segment_index")
                .and_then(Value::as_u64)
                .unwrap_or(0) as usize;
            let text = prompt
                .get("enhanced_prompt")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let path = output_dir.join(format!("image_{index:02}.png"));

            match self.renderer.render(text, &path).await {
                Ok(written) => {
                    rendered += 1;
                    generated.push(json!({
                        "segment_index": index,
                        "status": "success",
                        "image_path": written,
                        "prompt": text,
                    }));
                }
                Err(e) => {
                    error!(index, error = %e, "image render failed");
                    generated.push(json!({
                        "segment_index": index,
                        "status": "failed",
                        "error": e.to_string(),
                        "prompt": text,
                    }));
                }
            }
        }
        info!(
            rendered,
            total = prompts.len(),
            output_dir = %output_dir.display(),
            "image rendering complete"
        );

        self.status = AgentStatus::Completed;
        AgentResult::completed(
            self.name(),
            json!({
                "generated_images": generated,
                "image_count": rendered,
                "output_directory": output_dir,
            }),
        )
    }
}
