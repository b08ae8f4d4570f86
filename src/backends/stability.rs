use crate::{
    backends::{probe, random_seed, ImageBackend, RedirectBackend},
    error::{Result, RimagenError},
    models::{
        wire::{StabilityPrompt, StabilityRequest, StabilityResponse},
        ImageReference,
    },
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use std::time::Duration;

pub const NAME: &str = "stability";
pub const NEGATIVE_PROMPT: &str =
    "blurry, low quality, distorted, deformed, ugly, watermark, text, signature";

/// JSON text-to-image POST returning base64 artifacts. When it fails for any
/// reason the alternate URL strategy is tried before giving up.
///
/// When `request_timeout` is set the primary request is cut off after it, so
/// the alternate still fits inside the caller's per-backend bound.
#[derive(Clone)]
pub struct StabilityBackend {
    client: Client,
    url: String,
    api_key: Option<String>,
    width: u32,
    height: u32,
    alternate: Option<RedirectBackend>,
    request_timeout: Option<Duration>,
}

impl StabilityBackend {
    pub fn new(
        client: Client,
        url: impl Into<String>,
        api_key: Option<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            api_key,
            width,
            height,
            alternate: None,
            request_timeout: None,
        }
    }

    pub fn with_alternate(mut self, alternate: RedirectBackend) -> Self {
        self.alternate = Some(alternate);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    async fn bounded_request(&self, prompt: &str) -> Result<ImageReference> {
        match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, self.request_image(prompt))
                .await
                .map_err(|_| RimagenError::Timeout(limit.as_secs()))?,
            None => self.request_image(prompt).await,
        }
    }

    pub fn build_request(&self, prompt: &str, seed: u32) -> StabilityRequest {
        StabilityRequest {
            text_prompts: vec![
                StabilityPrompt {
                    text: prompt.to_string(),
                    weight: 1.0,
                },
                StabilityPrompt {
                    text: NEGATIVE_PROMPT.to_string(),
                    weight: -1.0,
                },
            ],
            cfg_scale: 7.0,
            height: self.height,
            width: self.width,
            samples: 1,
            steps: 30,
            seed,
        }
    }

    async fn request_image(&self, prompt: &str) -> Result<ImageReference> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| RimagenError::backend(NAME, "no API key configured"))?;

        let body = self.build_request(prompt, random_seed());
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(RimagenError::backend(
                NAME,
                format!("HTTP {}: {}", status, text),
            ));
        }

        let parsed: StabilityResponse = response
            .json()
            .await
            .map_err(|e| RimagenError::backend(NAME, format!("unreadable response: {}", e)))?;
        decode_artifact(&parsed)
    }
}

/// First artifact's base64 payload as a verified PNG.
pub fn decode_artifact(response: &StabilityResponse) -> Result<ImageReference> {
    let artifact = response
        .artifacts
        .first()
        .ok_or_else(|| RimagenError::backend(NAME, "no artifacts returned"))?;
    if let Some(reason) = artifact.finish_reason.as_deref() {
        if reason != "SUCCESS" {
            return Err(RimagenError::backend(
                NAME,
                format!("generation finished with {}", reason),
            ));
        }
    }
    let encoded = artifact
        .base64
        .as_deref()
        .ok_or_else(|| RimagenError::backend(NAME, "artifact has no payload"))?;
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| RimagenError::backend(NAME, format!("bad base64: {}", e)))?;
    probe::inspect(&bytes)?;
    Ok(ImageReference::Inline {
        mime: probe::sniff_mime(&bytes).to_string(),
        bytes,
    })
}

#[async_trait]
impl ImageBackend for StabilityBackend {
    fn name(&self) -> &str {
        NAME
    }

    async fn generate(&self, prompt: &str) -> Result<ImageReference> {
        match self.bounded_request(prompt).await {
            Ok(image) => Ok(image),
            Err(e) => match &self.alternate {
                Some(alternate) => {
                    log::warn!(
                        "{} failed ({}), trying {}",
                        NAME,
                        e,
                        alternate.name()
                    );
                    alternate.generate(prompt).await
                }
                None => Err(e),
            },
        }
    }
}
