use crate::{
    error::{Result, RimagenError},
    i18n::MessageKey,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MAX_PROMPT_CHARS: usize = 500;
pub const API_KEY_PREFIX: &str = "AIza";
pub const API_KEY_LEN: usize = 39;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ImageStyle {
    #[default]
    Realistic,
    Artistic,
    Anime,
    DigitalArt,
    OilPainting,
    Watercolor,
    Sketch,
    Cinematic,
}

impl ImageStyle {
    pub const ALL: [ImageStyle; 8] = [
        ImageStyle::Realistic,
        ImageStyle::Artistic,
        ImageStyle::Anime,
        ImageStyle::DigitalArt,
        ImageStyle::OilPainting,
        ImageStyle::Watercolor,
        ImageStyle::Sketch,
        ImageStyle::Cinematic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageStyle::Realistic => "realistic",
            ImageStyle::Artistic => "artistic",
            ImageStyle::Anime => "anime",
            ImageStyle::DigitalArt => "digital-art",
            ImageStyle::OilPainting => "oil-painting",
            ImageStyle::Watercolor => "watercolor",
            ImageStyle::Sketch => "sketch",
            ImageStyle::Cinematic => "cinematic",
        }
    }

    pub fn modifier(&self) -> &'static str {
        match self {
            ImageStyle::Realistic => "photorealistic, realistic lighting, natural details",
            ImageStyle::Artistic => "artistic, creative composition, expressive",
            ImageStyle::Anime => "anime style, vibrant colors, clean line art",
            ImageStyle::DigitalArt => "digital art, concept art, trending on artstation",
            ImageStyle::OilPainting => "oil painting, visible brush strokes, classical",
            ImageStyle::Watercolor => "watercolor painting, soft washes, paper texture",
            ImageStyle::Sketch => "pencil sketch, detailed linework, monochrome",
            ImageStyle::Cinematic => "cinematic shot, dramatic lighting, film grain",
        }
    }
}

impl fmt::Display for ImageStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageStyle {
    type Err = RimagenError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        ImageStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == normalized)
            .ok_or_else(|| RimagenError::ValidationError(format!("Unknown style: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    Standard,
    #[default]
    High,
    Ultra,
}

impl ImageQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageQuality::Standard => "standard",
            ImageQuality::High => "high",
            ImageQuality::Ultra => "ultra",
        }
    }

    pub fn modifier(&self) -> &'static str {
        match self {
            ImageQuality::Standard => "good quality",
            ImageQuality::High => "high quality, highly detailed, sharp focus",
            ImageQuality::Ultra => "masterpiece, ultra detailed, 8k resolution, best quality",
        }
    }
}

impl fmt::Display for ImageQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageQuality {
    type Err = RimagenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(ImageQuality::Standard),
            "high" => Ok(ImageQuality::High),
            "ultra" => Ok(ImageQuality::Ultra),
            other => Err(RimagenError::ValidationError(format!(
                "Unknown quality: {}",
                other
            ))),
        }
    }
}

pub const WATERMARK_FREE_MODIFIER: &str = "no watermark, no text, no signature, clean image";

/// Reasons a request is refused before any network traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    InvalidApiKey,
    EmptyPrompt,
    PromptTooLong,
}

impl ValidationFailure {
    pub fn message_key(&self) -> MessageKey {
        match self {
            ValidationFailure::InvalidApiKey => MessageKey::InvalidApiKey,
            ValidationFailure::EmptyPrompt => MessageKey::EmptyPrompt,
            ValidationFailure::PromptTooLong => MessageKey::PromptTooLong,
        }
    }
}

/// `AIza` followed by 35 characters of `[A-Za-z0-9_-]`.
pub fn is_valid_api_key(key: &str) -> bool {
    let key = key.trim();
    key.len() == API_KEY_LEN
        && key.starts_with(API_KEY_PREFIX)
        && key[API_KEY_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

pub fn validate_prompt(prompt: &str) -> std::result::Result<(), ValidationFailure> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(ValidationFailure::EmptyPrompt);
    }
    if trimmed.chars().count() > MAX_PROMPT_CHARS {
        return Err(ValidationFailure::PromptTooLong);
    }
    Ok(())
}

pub fn validate(api_key: &str, prompt: &str) -> std::result::Result<(), ValidationFailure> {
    if !is_valid_api_key(api_key) {
        return Err(ValidationFailure::InvalidApiKey);
    }
    validate_prompt(prompt)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub api_key: String,
    pub raw_prompt: String,
    pub style: ImageStyle,
    pub quality: ImageQuality,
    pub remove_watermark: bool,
}

impl GenerationRequest {
    pub fn new(api_key: impl Into<String>, raw_prompt: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            raw_prompt: raw_prompt.into(),
            style: ImageStyle::default(),
            quality: ImageQuality::default(),
            remove_watermark: false,
        }
    }

    pub fn with_style(mut self, style: ImageStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_quality(mut self, quality: ImageQuality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_watermark_removal(mut self, enabled: bool) -> Self {
        self.remove_watermark = enabled;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), ValidationFailure> {
        validate(&self.api_key, &self.raw_prompt)
    }

    /// The user's prompt followed by the style, quality and watermark modifiers.
    pub fn enriched_prompt(&self) -> String {
        let mut prompt = format!(
            "{}, {}, {}",
            self.raw_prompt.trim(),
            self.style.modifier(),
            self.quality.modifier()
        );
        if self.remove_watermark {
            prompt.push_str(", ");
            prompt.push_str(WATERMARK_FREE_MODIFIER);
        }
        prompt
    }
}
