use crate::{
    backends::{probe, random_seed, ImageBackend},
    error::{Result, RimagenError},
    models::ImageReference,
};
use async_trait::async_trait;
use reqwest::{Client, Url};

pub const NAME: &str = "redirect";
pub const QUALITY_MODIFIERS: &str = "high quality, detailed, 4k";

/// Builds a prompt-to-image URL on a public redirect service. The URL is the
/// result once it has been fetched and decoded to a non-empty image.
#[derive(Clone)]
pub struct RedirectBackend {
    client: Client,
    base_url: String,
    width: u32,
    height: u32,
    model: Option<String>,
    name: String,
}

impl RedirectBackend {
    pub fn new(client: Client, base_url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            width,
            height,
            model: None,
            name: NAME.to_string(),
        }
    }

    /// Same service with an explicit `model` parameter.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        self.name = format!("{}:{}", NAME, model);
        self.model = Some(model);
        self
    }

    pub fn build_url(&self, prompt: &str, seed: u32) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| RimagenError::ConfigError(format!("bad redirect base URL: {}", e)))?;
        let augmented = format!("{}, {}", prompt.trim(), QUALITY_MODIFIERS);
        url.path_segments_mut()
            .map_err(|_| RimagenError::ConfigError("redirect base URL cannot hold a path".into()))?
            .pop_if_empty()
            .push("prompt")
            .push(&augmented);

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("width", &self.width.to_string())
                .append_pair("height", &self.height.to_string())
                .append_pair("seed", &seed.to_string())
                .append_pair("nologo", "true");
            if let Some(model) = &self.model {
                query.append_pair("model", model);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl ImageBackend for RedirectBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, prompt: &str) -> Result<ImageReference> {
        let url = self.build_url(prompt, random_seed())?;
        probe::fetch_image(&self.client, url.as_str())
            .await
            .map_err(|e| RimagenError::backend(&self.name, e.to_string()))?;
        Ok(ImageReference::Url(url.to_string()))
    }
}
