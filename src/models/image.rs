use crate::{error::Result, i18n::MessageKey, models::request::ValidationFailure};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;

/// Longest side of the preview kept when an inline image is too large to
/// store in full.
pub const HISTORY_THUMBNAIL_SIZE: u32 = 128;

/// Where a generated image lives: a remote URL, or bytes held in memory.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ImageReference {
    Url(String),
    Inline { mime: String, bytes: Vec<u8> },
}

impl ImageReference {
    pub fn png(bytes: Vec<u8>) -> Self {
        ImageReference::Inline {
            mime: "image/png".to_string(),
            bytes,
        }
    }

    /// A fetchable URL or a `data:` URI.
    pub fn to_uri(&self) -> String {
        match self {
            ImageReference::Url(url) => url.clone(),
            ImageReference::Inline { mime, bytes } => {
                format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ImageReference::Url(url) => url.trim().is_empty(),
            ImageReference::Inline { bytes, .. } => bytes.is_empty(),
        }
    }

    /// URI to persist in history. URLs and small inline images are kept as
    /// is; an inline image whose `data:` URI exceeds `max_len` is replaced by
    /// a PNG thumbnail.
    pub fn history_uri(&self, max_len: usize) -> Result<String> {
        let uri = self.to_uri();
        let bytes = match self {
            ImageReference::Inline { bytes, .. } if uri.len() > max_len => bytes,
            _ => return Ok(uri),
        };

        let thumbnail = image::load_from_memory(bytes)?
            .thumbnail(HISTORY_THUMBNAIL_SIZE, HISTORY_THUMBNAIL_SIZE);
        let mut png = Vec::new();
        thumbnail.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
        log::debug!(
            "History preview shrunk from {} to {} bytes",
            bytes.len(),
            png.len()
        );
        Ok(ImageReference::png(png).to_uri())
    }

    /// File extension matching the payload type, `png` when unknown.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageReference::Inline { mime, .. } => extension_for_mime(mime),
            ImageReference::Url(_) => "png",
        }
    }
}

pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}

impl fmt::Debug for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageReference::Url(url) => f.debug_tuple("Url").field(url).finish(),
            ImageReference::Inline { mime, bytes } => f
                .debug_struct("Inline")
                .field("mime", mime)
                .field("len", &bytes.len())
                .finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation(ValidationFailure),
    AllServicesUnavailable,
}

impl FailureKind {
    pub fn message_key(&self) -> MessageKey {
        match self {
            FailureKind::Validation(failure) => failure.message_key(),
            FailureKind::AllServicesUnavailable => MessageKey::AllServicesUnavailable,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub success: bool,
    pub image: Option<ImageReference>,
    pub prompt: String,
    pub enhanced_prompt: Option<String>,
    pub error: Option<String>,
    pub failure: Option<FailureKind>,
    pub backend: Option<String>,
    pub timestamp: String,
}

impl GenerationResult {
    pub fn succeeded(
        prompt: impl Into<String>,
        image: ImageReference,
        enhanced_prompt: Option<String>,
        backend: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            image: Some(image),
            prompt: prompt.into(),
            enhanced_prompt,
            error: None,
            failure: None,
            backend: Some(backend.into()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn failed(prompt: impl Into<String>, failure: FailureKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            image: None,
            prompt: prompt.into(),
            enhanced_prompt: None,
            error: Some(message.into()),
            failure: Some(failure),
            backend: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn with_enhanced_prompt(mut self, enhanced: Option<String>) -> Self {
        self.enhanced_prompt = enhanced;
        self
    }
}
