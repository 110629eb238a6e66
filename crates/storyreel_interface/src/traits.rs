//! Collaborator driver traits.
//!
//! Text and image generation are external services with their own retry and
//! backoff; the core never imposes its own timeout on them.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use storyreel_error::StoryreelResult;

/// Driver for the text-generation collaborator.
///
/// Implementations own their retry policy. Calls are blocking from the
/// pipeline's perspective: the core awaits them in declared order.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for the given prompt.
    async fn generate(&self, prompt: &str) -> StoryreelResult<String>;

    /// Provider name (e.g., "gemini", "openai").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gemini-2.0-flash").
    fn model_name(&self) -> &str;
}

/// Driver for the image-generation collaborator.
#[async_trait]
pub trait ImageRenderer: Send + Sync {
    /// Render an image for the prompt, writing it to `output_path`.
    ///
    /// Returns the path of the written file, which may differ from
    /// `output_path` when the implementation appends an extension.
    async fn render(&self, prompt: &str, output_path: &Path) -> StoryreelResult<PathBuf>;

    /// Provider name (e.g., "imagen").
    fn provider_name(&self) -> &'static str;

    /// Model identifier.
    fn model_name(&self) -> &str;
}
