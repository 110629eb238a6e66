//! Role-tag to agent-instance resolution.

use crate::{ImageRenderAgent, PromptGenAgent, ScriptAgent, SegmenterAgent};
use std::sync::Arc;
use storyreel_error::{AgentError, AgentErrorKind, StoryreelResult};
use storyreel_interface::{Agent, ImageRenderer, TextGenerator};
use tracing::debug;

/// Role tags the registry can resolve, in workflow order.
pub const AGENT_ROLES: [&str; 4] = ["script", "segmenter", "prompt_gen", "image_render"];

/// Creates fresh agent instances for role tags and carries the collaborator
/// drivers they need.
///
/// Each call to [`AgentRegistry::get`] returns a new instance, so concurrent
/// workflows never share mutable agent state.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use storyreel_agent::AgentRegistry;
/// use storyreel_interface::{Agent, ImageRenderer, TextGenerator};
///
/// fn build(text: Arc<dyn TextGenerator>, images: Arc<dyn ImageRenderer>) {
///     let registry = AgentRegistry::new(text, images);
///     let agent = registry.get("segmenter").unwrap();
///     assert_eq!(agent.name(), "SegmenterAgent");
/// }
/// ```
#[derive(Clone)]
pub struct AgentRegistry {
    text: Arc<dyn TextGenerator>,
    images: Arc<dyn ImageRenderer>,
}

impl AgentRegistry {
    /// Create a registry over the given collaborator drivers.
    pub fn new(text: Arc<dyn TextGenerator>, images: Arc<dyn ImageRenderer>) -> Self {
        Self { text, images }
    }

    /// Resolve a role tag to a fresh agent instance.
    pub fn get(&self, role: &str) -> StoryreelResult<Box<dyn Agent>> {
        debug!(role, "resolving agent");
        match role {
            "script" => Ok(Box::new(ScriptAgent::new(Arc::clone(&self.text)))),
            "segmenter" => Ok(Box::new(SegmenterAgent::new())),
            "prompt_gen" => Ok(Box::new(PromptGenAgent::new())),
            "image_render" => Ok(Box::new(ImageRenderAgent::new(Arc::clone(&self.images)))),
            other => Err(AgentError::new(AgentErrorKind::UnknownAgent(other.to_string())).into()),
        }
    }

    /// Whether a role tag is resolvable.
    pub fn contains(&self, role: &str) -> bool {
        AGENT_ROLES.contains(&role)
    }

    /// Role tags this registry resolves, in workflow order.
    pub fn roles(&self) -> &'static [&'static str] {
        &AGENT_ROLES
    }

    /// Text collaborator shared by agents that generate prose.
    pub fn text_generator(&self) -> Arc<dyn TextGenerator> {
        Arc::clone(&self.text)
    }

    /// Image collaborator shared by agents that render stills.
    pub fn image_renderer(&self) -> Arc<dyn ImageRenderer> {
        Arc::clone(&self.images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};

    struct StubText;

    #[async_trait]
    impl TextGenerator for StubText {
        async fn generate(&self, _prompt: &str) -> StoryreelResult<String> {
            Ok("stub".to_string())
        }

        fn provider_name(&self) -> &'static str {
            "stub"
        }

        fn model_name(&self) -> &str {
            "stub-v1"
        }
    }

    struct StubImages;

    #[async_trait]
    impl ImageRenderer for StubImages {
        async fn render(&self, _prompt: &str, output_path: &Path) -> StoryreelResult<PathBuf> {
            Ok(output_path.to_path_buf())
        }

        fn provider_name(&self) -> &'static str {
            "stub"
        }

        fn model_name(&self) -> &str {
            "stub-v1"
        }
    }

    fn registry() -> AgentRegistry {
        AgentRegistry::new(Arc::new(StubText), Arc::new(StubImages))
    }

    #[test]
    fn resolves_every_declared_role() {
        let registry = registry();
        for role in AGENT_ROLES {
            assert!(registry.get(role).is_ok(), "role {role} should resolve");
            assert!(registry.contains(role));
        }
    }

    #[test]
    fn unknown_role_is_an_error() {
        let registry = registry();
        let Err(err) = registry.get("narrator") else {
            panic!("expected an error for unknown role");
        };
        assert!(format!("{err}").contains("Unknown agent type: narrator"));
        assert!(!registry.contains("narrator"));
    }

    #[test]
    fn instances_are_fresh_per_call() {
        let registry = registry();
        let a = registry.get("script").unwrap();
        let b = registry.get("script").unwrap();
        assert_eq!(a.name(), b.name());
        assert_eq!(a.status(), storyreel_core::AgentStatus::Idle);
    }
}
