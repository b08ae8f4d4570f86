use crate::{
    backends::{probe, ImageBackend},
    error::{Result, RimagenError},
    models::{wire::FormImageResponse, ImageReference},
};
use async_trait::async_trait;
use reqwest::{multipart::Form, Client};

pub const NAME: &str = "form";

/// Multipart text-to-image POST. The service answers either with raw image
/// bytes or with `{"output_url": ...}`, which is fetched once to verify it.
#[derive(Clone)]
pub struct FormBackend {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl FormBackend {
    pub fn new(client: Client, url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            url: url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl ImageBackend for FormBackend {
    fn name(&self) -> &str {
        NAME
    }

    async fn generate(&self, prompt: &str) -> Result<ImageReference> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| RimagenError::backend(NAME, "no API key configured"))?;

        let form = Form::new().text("prompt", prompt.to_string());
        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RimagenError::backend(
                NAME,
                format!("HTTP {}: {}", status, body),
            ));
        }

        let is_image = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or(false, |ct| ct.starts_with("image/"));

        if is_image {
            let bytes = response.bytes().await?.to_vec();
            probe::inspect(&bytes)?;
            return Ok(ImageReference::Inline {
                mime: probe::sniff_mime(&bytes).to_string(),
                bytes,
            });
        }

        let parsed: FormImageResponse = response
            .json()
            .await
            .map_err(|e| RimagenError::backend(NAME, format!("unreadable response: {}", e)))?;
        let url = parsed
            .output_url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| RimagenError::backend(NAME, "response has no output_url"))?;

        probe::fetch_image(&self.client, &url).await?;
        Ok(ImageReference::Url(url))
    }
}
