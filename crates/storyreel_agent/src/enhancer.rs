//! Prompt enhancement via style-template substitution.

use regex::Regex;
use storyreel_core::StylePreset;
use tracing::debug;

/// Phrase fragments for one style preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleTemplate {
    /// Opening phrase, e.g. "Ultra-realistic cinematic shot"
    pub prefix: &'static str,
    /// Quality descriptors
    pub quality: &'static str,
    /// Lighting descriptors
    pub lighting: &'static str,
    /// Camera descriptors
    pub camera: &'static str,
    /// Style descriptors
    pub style: &'static str,
    /// Mood descriptors
    pub mood: &'static str,
}

/// Template fragments for a preset.
pub fn template(preset: StylePreset) -> StyleTemplate {
    match preset {
        StylePreset::Cinematic4k => StyleTemplate {
            prefix: "Ultra-realistic cinematic shot",
            quality: "4K resolution, professional cinematography",
            lighting: "dramatic lighting, depth of field",
            camera: "shot with RED camera, shallow depth of field",
            style: "film grain, color graded, cinematic composition",
            mood: "cinematic atmosphere",
        },
        StylePreset::GoldenHour => StyleTemplate {
            prefix: "Beautiful golden hour scene",
            quality: "high resolution, professional photography",
            lighting: "warm golden hour lighting, soft shadows",
            camera: "perfect exposure, bokeh background",
            style: "warm color palette, glowing light",
            mood: "serene and warm atmosphere",
        },
        StylePreset::DramaticLighting => StyleTemplate {
            prefix: "Dramatically lit scene",
            quality: "high contrast, professional lighting",
            lighting: "dramatic chiaroscuro lighting, strong shadows",
            camera: "professional photography, sharp focus",
            style: "high contrast, moody atmosphere",
            mood: "intense and dramatic mood",
        },
        StylePreset::PovPerspective => StyleTemplate {
            prefix: "First-person perspective view",
            quality: "immersive POV shot, realistic perspective",
            lighting: "natural lighting, realistic shadows",
            camera: "first-person viewpoint, wide angle lens",
            style: "POV camera angle, immersive experience",
            mood: "immersive and engaging",
        },
        StylePreset::Documentary => StyleTemplate {
            prefix: "Documentary-style photograph",
            quality: "photojournalistic quality, authentic",
            lighting: "natural lighting, realistic exposure",
            camera: "handheld camera feel, natural framing",
            style: "documentary photography, candid moment",
            mood: "authentic and real",
        },
        StylePreset::Artistic => StyleTemplate {
            prefix: "Artistic interpretation",
            quality: "fine art quality, creative composition",
            lighting: "artistic lighting, creative shadows",
            camera: "artistic framing, unique perspective",
            style: "artistic style, creative interpretation",
            mood: "creative and inspiring",
        },
        StylePreset::Realistic => StyleTemplate {
            prefix: "Photorealistic scene",
            quality: "ultra-realistic, lifelike detail",
            lighting: "natural realistic lighting",
            camera: "realistic camera settings, natural perspective",
            style: "photorealistic rendering, true-to-life",
            mood: "authentic and believable",
        },
        StylePreset::Vintage => StyleTemplate {
            prefix: "Vintage-style photograph",
            quality: "vintage film quality, nostalgic feel",
            lighting: "soft vintage lighting, film grain",
            camera: "vintage camera feel, classic composition",
            style: "retro color grading, vintage aesthetic",
            mood: "nostalgic and timeless",
        },
    }
}

/// Optional overrides applied on top of a style template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnhancementConfig {
    /// Replace the template's lighting phrase
    pub lighting_style: Option<String>,
    /// Replace the template's camera phrase
    pub camera_angle: Option<String>,
    /// Replace the template's mood phrase
    pub mood: Option<String>,
    /// Append a color grading phrase
    pub color_grading: Option<String>,
    /// Aspect ratio tag; `None` omits it
    pub aspect_ratio: Option<String>,
    /// Extra free-form tags appended at the end
    pub additional_tags: Vec<String>,
}

impl EnhancementConfig {
    /// Default configuration used by the prompt-generation agent.
    pub fn standard() -> Self {
        Self {
            aspect_ratio: Some("16:9".to_string()),
            ..Self::default()
        }
    }
}

/// Turns a basic scene description into a detailed image prompt.
///
/// # Examples
///
/// ```
/// use storyreel_agent::PromptEnhancer;
/// use storyreel_core::StylePreset;
///
/// let enhancer = PromptEnhancer::new();
/// let prompt = enhancer.enhance("a lighthouse in a storm", StylePreset::Cinematic4k);
/// assert!(prompt.starts_with("Ultra-realistic cinematic shot, of a lighthouse in a storm"));
/// ```
#[derive(Debug, Clone)]
pub struct PromptEnhancer {
    whitespace: Regex,
    enhancement_keywords: Regex,
}

impl PromptEnhancer {
    /// Create an enhancer.
    pub fn new() -> Self {
        Self {
            whitespace: Regex::new(r"\s+").expect("valid whitespace regex"),
            // Keywords the templates add themselves; stripped from input to
            // avoid duplication.
            enhancement_keywords: Regex::new(
                r"(?i)\b(ultra-realistic|cinematic|4k|professional|dramatic|high resolution|depth of field|bokeh|film grain)\b",
            )
            .expect("valid keyword regex"),
        }
    }

    /// Collapse whitespace and strip enhancement keywords already present in
    /// the description.
    pub fn clean_description(&self, description: &str) -> String {
        let text = self.whitespace.replace_all(description.trim(), " ");
        let text = self.enhancement_keywords.replace_all(&text, "");
        self.whitespace
            .replace_all(text.trim(), " ")
            .trim()
            .to_string()
    }

    /// Enhance a description with the standard configuration.
    pub fn enhance(&self, description: &str, preset: StylePreset) -> String {
        self.enhance_with(description, preset, &EnhancementConfig::standard())
    }

    /// Enhance a description with explicit overrides.
    pub fn enhance_with(
        &self,
        description: &str,
        preset: StylePreset,
        config: &EnhancementConfig,
    ) -> String {
        debug!(preset = %preset, "enhancing prompt");
        let template = template(preset);
        let cleaned = self.clean_description(description);

        let mut parts: Vec<String> = vec![
            template.prefix.to_string(),
            format!("of {cleaned}"),
            template.quality.to_string(),
            config
                .lighting_style
                .clone()
                .unwrap_or_else(|| template.lighting.to_string()),
            config
                .camera_angle
                .clone()
                .unwrap_or_else(|| template.camera.to_string()),
            template.style.to_string(),
            config
                .mood
                .clone()
                .unwrap_or_else(|| template.mood.to_string()),
        ];
        if let Some(ratio) = &config.aspect_ratio {
            parts.push(format!("aspect ratio {ratio}"));
        }
        if let Some(grading) = &config.color_grading {
            parts.push(grading.clone());
        }
        parts.extend(config.additional_tags.iter().cloned());

        let prompt = parts.join(", ");
        self.whitespace
            .replace_all(prompt.trim(), " ")
            .trim()
            .to_string()
    }

    /// Quality diagnostics for an enhanced prompt. Empty vec means clean.
    pub fn validate_prompt(&self, prompt: &str) -> Vec<String> {
        let mut issues = Vec::new();
        if prompt.len() < 50 {
            issues.push("prompt may be too short for detailed generation".to_string());
        } else if prompt.len() > 500 {
            issues.push("prompt may be too long and could be truncated".to_string());
        }

        let lower = prompt.to_lowercase();
        let missing: Vec<&str> = ["lighting", "quality", "resolution", "style"]
            .iter()
            .filter(|k| !lower.contains(**k))
            .copied()
            .collect();
        if !missing.is_empty() {
            issues.push(format!("missing essential elements: {}", missing.join(", ")));
        }
        issues
    }
}

impl Default for PromptEnhancer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enhance_substitutes_the_preset_template() {
        let enhancer = PromptEnhancer::new();
        let prompt = enhancer.enhance("a quiet harbor at dusk", StylePreset::GoldenHour);
        assert!(prompt.starts_with("Beautiful golden hour scene, of a quiet harbor at dusk"));
        assert!(prompt.contains("warm golden hour lighting"));
        assert!(prompt.contains("aspect ratio 16:9"));
    }

    #[test]
    fn clean_description_strips_duplicate_keywords() {
        let enhancer = PromptEnhancer::new();
        let cleaned = enhancer.clean_description("a cinematic   4K shot of a    castle");
        assert_eq!(cleaned, "a shot of a castle");
    }

    #[test]
    fn overrides_replace_template_fragments() {
        let enhancer = PromptEnhancer::new();
        let config = EnhancementConfig {
            lighting_style: Some("moonlit backlight".to_string()),
            additional_tags: vec!["wide shot".to_string()],
            ..EnhancementConfig::standard()
        };
        let prompt = enhancer.enhance_with("a ruined tower", StylePreset::Vintage, &config);
        assert!(prompt.contains("moonlit backlight"));
        assert!(!prompt.contains("soft vintage lighting"));
        assert!(prompt.ends_with("wide shot"));
    }

    #[test]
    fn validate_prompt_flags_short_prompts() {
        let enhancer = PromptEnhancer::new();
        let issues = enhancer.validate_prompt("tiny");
        assert!(issues.iter().any(|i| i.contains("too short")));
    }

    #[test]
    fn validate_prompt_accepts_enhanced_length() {
        let enhancer = PromptEnhancer::new();
        let prompt = enhancer.enhance("a market street in the rain", StylePreset::Cinematic4k);
        let issues = enhancer.validate_prompt(&prompt);
        assert!(!issues
            .iter()
            .any(|i| i.contains("too short") || i.contains("too long")));
    }
}
