//! Style presets for prompt enhancement.

use serde::{Deserialize, Serialize};

/// Visual styling preset applied when enhancing segment text into an image
/// prompt.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum StylePreset {
    /// Ultra-realistic cinematic rendering
    #[default]
    #[display("cinematic_4k")]
    Cinematic4k,
    /// Warm golden hour photography
    #[display("golden_hour")]
    GoldenHour,
    /// High-contrast chiaroscuro lighting
    #[display("dramatic_lighting")]
    DramaticLighting,
    /// First-person perspective framing
    #[display("pov_perspective")]
    PovPerspective,
    /// Photojournalistic documentary look
    #[display("documentary")]
    Documentary,
    /// Fine-art creative interpretation
    #[display("artistic")]
    Artistic,
    /// Photorealistic true-to-life rendering
    #[display("realistic")]
    Realistic,
    /// Retro film aesthetic
    #[display("vintage")]
    Vintage,
}
