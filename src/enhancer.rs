use crate::{
    config::EnhancerConfig,
    error::{Result, RimagenError},
    models::wire::{
        EnhanceContent, EnhanceGenerationConfig, EnhancePart, EnhanceRequest, EnhanceResponse,
    },
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Rewrites a prompt into a more descriptive one. Callers treat every error
/// as "keep the original prompt".
#[async_trait]
pub trait PromptEnhancer: Send + Sync {
    async fn enhance(&self, api_key: &str, prompt: &str) -> Result<String>;
}

pub fn enhancement_instruction(prompt: &str) -> String {
    format!(
        "Rewrite the following image description as a single detailed English prompt for an \
         image generation model. Describe colors, lighting, artistic style and image quality. \
         Keep it under 150 words and reply with the prompt only, no preamble.\n\nDescription: {}",
        prompt
    )
}

/// `generateContent` text endpoint, key passed as a query parameter.
#[derive(Clone)]
pub struct GeminiEnhancer {
    client: Client,
    base_url: String,
    model: String,
}

impl GeminiEnhancer {
    pub fn new(config: &EnhancerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RimagenError::ConfigError(format!("HTTP client: {}", e)))?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &EnhancerConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_request(prompt: &str) -> EnhanceRequest {
        EnhanceRequest {
            contents: vec![EnhanceContent {
                parts: vec![EnhancePart {
                    text: Some(enhancement_instruction(prompt)),
                }],
            }],
            generation_config: EnhanceGenerationConfig::default(),
        }
    }
}

#[async_trait]
impl PromptEnhancer for GeminiEnhancer {
    async fn enhance(&self, api_key: &str, prompt: &str) -> Result<String> {
        log::debug!("Requesting prompt enhancement from {}", self.model);

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&Self::build_request(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RimagenError::ResponseError(format!(
                "enhancement endpoint returned {}: {}",
                status, body
            )));
        }

        let parsed: EnhanceResponse = response
            .json()
            .await
            .map_err(|e| RimagenError::ResponseError(e.to_string()))?;

        parsed
            .first_text()
            .ok_or_else(|| RimagenError::ResponseError("enhancement returned no text".into()))
    }
}
