//! Agent implementations for the Storyreel content pipeline.
//!
//! Four roles cover the workflow: script preprocessing, segmentation,
//! prompt enhancement, and image rendering. The [`AgentRegistry`] maps role
//! tags to instances and carries the collaborator drivers, replacing any
//! global registry state.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod enhancer;
mod image_render;
mod prompt_gen;
mod registry;
mod script;
mod segmenter;

pub use enhancer::{template, EnhancementConfig, PromptEnhancer, StyleTemplate};
pub use image_render::ImageRenderAgent;
pub use prompt_gen::PromptGenAgent;
pub use registry::{AgentRegistry, AGENT_ROLES};
pub use script::ScriptAgent;
pub use segmenter::SegmenterAgent;
