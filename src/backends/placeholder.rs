use crate::{
    backends::ImageBackend,
    config::PlaceholderConfig,
    error::{Result, RimagenError},
    models::ImageReference,
};
use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const NAME: &str = "placeholder";

pub const DEFAULT_GRADIENT: ([u8; 3], [u8; 3]) = ([0x63, 0x66, 0xf1], [0x8b, 0x5c, 0xf6]);

const MAX_CAPTION_LINES: usize = 3;

/// English and Arabic color words mapped to gradient endpoints. Earlier
/// entries take precedence.
const COLOR_KEYWORDS: &[(&str, [u8; 3], [u8; 3])] = &[
    ("sunset", [0xf9, 0x73, 0x16], [0xdb, 0x27, 0x77]),
    ("ocean", [0x06, 0xb6, 0xd4], [0x1e, 0x3a, 0x8a]),
    ("forest", [0x16, 0xa3, 0x4a], [0x14, 0x53, 0x2d]),
    ("red", [0xef, 0x44, 0x44], [0x99, 0x1b, 0x1b]),
    ("أحمر", [0xef, 0x44, 0x44], [0x99, 0x1b, 0x1b]),
    ("blue", [0x3b, 0x82, 0xf6], [0x1e, 0x40, 0xaf]),
    ("أزرق", [0x3b, 0x82, 0xf6], [0x1e, 0x40, 0xaf]),
    ("green", [0x22, 0xc5, 0x5e], [0x15, 0x80, 0x3d]),
    ("أخضر", [0x22, 0xc5, 0x5e], [0x15, 0x80, 0x3d]),
    ("yellow", [0xfa, 0xcc, 0x15], [0xca, 0x8a, 0x04]),
    ("أصفر", [0xfa, 0xcc, 0x15], [0xca, 0x8a, 0x04]),
    ("orange", [0xfb, 0x92, 0x3c], [0xea, 0x58, 0x0c]),
    ("برتقالي", [0xfb, 0x92, 0x3c], [0xea, 0x58, 0x0c]),
    ("purple", [0xa8, 0x55, 0xf7], [0x6b, 0x21, 0xa8]),
    ("بنفسجي", [0xa8, 0x55, 0xf7], [0x6b, 0x21, 0xa8]),
    ("pink", [0xf4, 0x72, 0xb6], [0xbe, 0x18, 0x5d]),
    ("وردي", [0xf4, 0x72, 0xb6], [0xbe, 0x18, 0x5d]),
    ("gold", [0xfb, 0xbf, 0x24], [0xb4, 0x53, 0x09]),
    ("ذهبي", [0xfb, 0xbf, 0x24], [0xb4, 0x53, 0x09]),
    ("black", [0x37, 0x41, 0x51], [0x03, 0x07, 0x12]),
    ("أسود", [0x37, 0x41, 0x51], [0x03, 0x07, 0x12]),
    ("white", [0xf9, 0xfa, 0xfb], [0xd1, 0xd5, 0xdb]),
    ("أبيض", [0xf9, 0xfa, 0xfb], [0xd1, 0xd5, 0xdb]),
];

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

pub fn gradient_for(prompt: &str) -> ([u8; 3], [u8; 3]) {
    let lowered = prompt.to_lowercase();
    COLOR_KEYWORDS
        .iter()
        .find(|(keyword, _, _)| lowered.contains(keyword))
        .map(|(_, start, end)| (*start, *end))
        .unwrap_or(DEFAULT_GRADIENT)
}

fn load_font(explicit: Option<&Path>) -> Option<FontVec> {
    let candidates = explicit
        .map(Path::to_path_buf)
        .into_iter()
        .chain(SYSTEM_FONTS.iter().map(|p| PathBuf::from(*p)));

    for path in candidates {
        let Ok(bytes) = std::fs::read(&path) else {
            continue;
        };
        match FontVec::try_from_vec(bytes) {
            Ok(font) => {
                log::debug!("Placeholder caption font: {}", path.display());
                return Some(font);
            }
            Err(e) => log::warn!("Ignoring unreadable font {}: {}", path.display(), e),
        }
    }
    None
}

/// Renders a gradient card captioned with the prompt. Needs no network and
/// is the last link of the chain.
#[derive(Clone)]
pub struct PlaceholderBackend {
    width: u32,
    height: u32,
    font: Option<Arc<FontVec>>,
}

impl PlaceholderBackend {
    pub fn new(config: &PlaceholderConfig) -> Self {
        let font = load_font(config.font_path.as_deref()).map(Arc::new);
        if font.is_none() {
            log::debug!("No caption font found, placeholders will carry no text");
        }
        Self {
            width: config.width.max(1),
            height: config.height.max(1),
            font,
        }
    }

    /// No caption text, regardless of installed fonts.
    pub fn without_text(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            font: None,
        }
    }

    pub fn render(&self, prompt: &str) -> RgbaImage {
        let (start, end) = gradient_for(prompt);
        let (w, h) = (self.width, self.height);
        let span = (w + h).saturating_sub(2).max(1) as f32;

        let mut canvas = RgbaImage::from_fn(w, h, |x, y| {
            let t = (x + y) as f32 / span;
            Rgba([
                lerp(start[0], end[0], t),
                lerp(start[1], end[1], t),
                lerp(start[2], end[2], t),
                255,
            ])
        });

        let band_top = h - h / 4;
        for y in band_top..h {
            for x in 0..w {
                let px = canvas.get_pixel_mut(x, y);
                for channel in 0..3 {
                    px[channel] = (px[channel] as f32 * 0.55) as u8;
                }
            }
        }

        if let Some(font) = &self.font {
            self.draw_caption(&mut canvas, font, prompt, band_top);
        }
        canvas
    }

    fn draw_caption(&self, canvas: &mut RgbaImage, font: &FontVec, prompt: &str, band_top: u32) {
        let size = (self.width as f32 * 0.045).max(12.0);
        let scale = PxScale::from(size);
        let padding = (size * 0.8) as i32;
        let max_width = self.width as f32 - 2.0 * padding as f32;
        let line_height = (size * 1.3) as i32;

        let lines = wrap_caption(prompt, font, scale, max_width);
        for (i, line) in lines.iter().enumerate() {
            let y = band_top as i32 + padding / 2 + i as i32 * line_height;
            imageproc::drawing::draw_text_mut(
                canvas,
                Rgba([255, 255, 255, 255]),
                padding,
                y,
                scale,
                font,
                line,
            );
        }
    }

    pub fn encode_png(image: RgbaImage) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| RimagenError::backend(NAME, format!("PNG encoding failed: {}", e)))?;
        Ok(bytes)
    }
}

fn lerp(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t.clamp(0.0, 1.0)).round() as u8
}

fn text_width(font: &FontVec, scale: PxScale, text: &str) -> f32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut prev = None;
    for c in text.chars() {
        let glyph = scaled.glyph_id(c);
        if let Some(prev) = prev {
            width += scaled.kern(prev, glyph);
        }
        width += scaled.h_advance(glyph);
        prev = Some(glyph);
    }
    width
}

fn wrap_caption(text: &str, font: &FontVec, scale: PxScale, max_width: f32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut truncated = false;

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if text_width(font, scale, &candidate) > max_width && !current.is_empty() {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            if lines.len() == MAX_CAPTION_LINES {
                truncated = true;
                break;
            }
        } else {
            current = candidate;
        }
    }
    if !truncated && !current.is_empty() {
        lines.push(current);
    }
    if truncated {
        if let Some(last) = lines.last_mut() {
            last.push('…');
        }
    }
    lines
}

#[async_trait]
impl ImageBackend for PlaceholderBackend {
    fn name(&self) -> &str {
        NAME
    }

    async fn generate(&self, prompt: &str) -> Result<ImageReference> {
        let renderer = self.clone();
        let prompt = prompt.to_string();
        // rasterizing and PNG encoding are CPU-bound
        let bytes = tokio::task::spawn_blocking(move || Self::encode_png(renderer.render(&prompt)))
            .await
            .map_err(|e| RimagenError::InternalError(format!("placeholder task failed: {}", e)))??;
        log::info!(
            "🎨 Rendered {}x{} placeholder ({} bytes)",
            self.width,
            self.height,
            bytes.len()
        );
        Ok(ImageReference::png(bytes))
    }
}
