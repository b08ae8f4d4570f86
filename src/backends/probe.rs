use crate::error::{Result, RimagenError};
use reqwest::Client;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbedImage {
    pub width: u32,
    pub height: u32,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Decodes `bytes` and rejects anything without real pixels.
pub fn inspect(bytes: &[u8]) -> Result<(u32, u32)> {
    let image = image::load_from_memory(bytes)?;
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(RimagenError::ResponseError(
            "image has zero natural dimensions".into(),
        ));
    }
    Ok((width, height))
}

pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Jpeg) => "image/jpeg",
        Ok(image::ImageFormat::WebP) => "image/webp",
        Ok(image::ImageFormat::Gif) => "image/gif",
        _ => "image/png",
    }
}

/// Fetches `url` (following redirects) and confirms it loads as an image.
pub async fn fetch_image(client: &Client, url: &str) -> Result<ProbedImage> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(RimagenError::ResponseError(format!(
            "image URL returned {}",
            status
        )));
    }
    let bytes = response.bytes().await?.to_vec();
    let (width, height) = inspect(&bytes)?;
    log::debug!("Verified image at {} ({}x{})", url, width, height);
    Ok(ProbedImage {
        width,
        height,
        mime: sniff_mime(&bytes).to_string(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgba};
    use std::io::Cursor;

    fn tiny_png() -> Vec<u8> {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_pixel(3, 2, Rgba([1, 2, 3, 255]));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        buf
    }

    #[test]
    fn inspect_reports_dimensions() {
        let png = tiny_png();
        assert_eq!(inspect(&png).unwrap(), (3, 2));
        assert_eq!(sniff_mime(&png), "image/png");
    }

    #[test]
    fn inspect_rejects_non_images() {
        assert!(inspect(b"<html>not an image</html>").is_err());
    }
}
