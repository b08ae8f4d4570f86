//! The generation pipeline: validate, enhance, then walk the backend chain
//! until one produces an image.

use crate::{
    backends::{FormBackend, ImageBackend, PlaceholderBackend, RedirectBackend, StabilityBackend},
    config::Config,
    enhancer::{GeminiEnhancer, PromptEnhancer},
    error::{Result, RimagenError},
    i18n::Language,
    logger,
    models::{self, FailureKind, GenerationRequest, GenerationResult, ImageReference},
};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_secs(60);

/// Image reference plus the name of the backend that produced it.
#[derive(Debug, Clone)]
pub struct ResolvedImage {
    pub image: ImageReference,
    pub backend: String,
}

pub struct ImageGenerationClient {
    enhancer: Option<Arc<dyn PromptEnhancer>>,
    backends: Vec<Arc<dyn ImageBackend>>,
    backend_timeout: Duration,
    language: Language,
}

#[derive(Default)]
pub struct ClientBuilder {
    enhancer: Option<Arc<dyn PromptEnhancer>>,
    backends: Vec<Arc<dyn ImageBackend>>,
    backend_timeout: Option<Duration>,
    language: Language,
}

impl ClientBuilder {
    pub fn enhancer(mut self, enhancer: Arc<dyn PromptEnhancer>) -> Self {
        self.enhancer = Some(enhancer);
        self
    }

    /// Appends a backend; call order is priority order.
    pub fn backend(mut self, backend: Arc<dyn ImageBackend>) -> Self {
        self.backends.push(backend);
        self
    }

    pub fn backend_timeout(mut self, timeout: Duration) -> Self {
        self.backend_timeout = Some(timeout);
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn build(self) -> ImageGenerationClient {
        ImageGenerationClient {
            enhancer: self.enhancer,
            backends: self.backends,
            backend_timeout: self.backend_timeout.unwrap_or(DEFAULT_BACKEND_TIMEOUT),
            language: self.language,
        }
    }
}

impl ImageGenerationClient {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// form → redirect → stability (with the alternate redirect model) →
    /// placeholder.
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.backend_timeout_secs.max(1));
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rimagen/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RimagenError::ConfigError(format!("HTTP client: {}", e)))?;

        let endpoints = &config.backends;
        let (width, height) = (config.image_width, config.image_height);

        let form = FormBackend::new(
            http.clone(),
            &endpoints.form_url,
            endpoints.form_api_key.clone(),
        );
        let redirect = RedirectBackend::new(http.clone(), &endpoints.redirect_base_url, width, height);
        let alternate = RedirectBackend::new(http.clone(), &endpoints.redirect_base_url, width, height)
            .with_model(&endpoints.alternate_model);
        let stability = StabilityBackend::new(
            http.clone(),
            &endpoints.stability_url,
            endpoints.stability_api_key.clone(),
            width,
            height,
        )
        .with_alternate(alternate)
        .with_request_timeout(timeout / 2);
        let placeholder = PlaceholderBackend::new(&config.placeholder);

        let mut builder = Self::builder()
            .backend(Arc::new(form))
            .backend(Arc::new(redirect))
            .backend(Arc::new(stability))
            .backend(Arc::new(placeholder))
            .backend_timeout(timeout);

        if config.enhancer.enabled {
            builder = builder.enhancer(Arc::new(GeminiEnhancer::new(&config.enhancer)?));
        }

        Ok(builder.build())
    }

    pub fn backend_names(&self) -> Vec<String> {
        self.backends.iter().map(|b| b.name().to_string()).collect()
    }

    /// Language of failure messages when the caller does not pick one.
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Runs the whole pipeline on `prompt` as given. Never fails: every
    /// problem comes back as an unsuccessful result.
    pub async fn generate(&self, api_key: &str, prompt: &str) -> GenerationResult {
        if let Err(failure) = models::validate(api_key, prompt) {
            return self.refuse(prompt, FailureKind::Validation(failure), self.language);
        }
        self.run(api_key.trim(), prompt, prompt.trim(), self.language)
            .await
    }

    /// Validates the raw prompt, then runs the pipeline on the prompt with
    /// style, quality and watermark modifiers appended.
    pub async fn generate_request(&self, request: &GenerationRequest) -> GenerationResult {
        self.generate_request_in(request, self.language).await
    }

    /// Same as [`generate_request`](Self::generate_request) with failure
    /// messages in `language`.
    pub async fn generate_request_in(
        &self,
        request: &GenerationRequest,
        language: Language,
    ) -> GenerationResult {
        if let Err(failure) = request.validate() {
            return self.refuse(&request.raw_prompt, FailureKind::Validation(failure), language);
        }
        let enriched = request.enriched_prompt();
        self.run(request.api_key.trim(), &request.raw_prompt, &enriched, language)
            .await
    }

    fn refuse(&self, prompt: &str, failure: FailureKind, language: Language) -> GenerationResult {
        let message = failure.message_key().text(language);
        log::warn!("Request refused: {}", message);
        GenerationResult::failed(prompt, failure, message)
    }

    async fn run(
        &self,
        api_key: &str,
        original: &str,
        working: &str,
        language: Language,
    ) -> GenerationResult {
        let _timer = logger::timer("generation pipeline");

        let enhanced = self.enhance_prompt(api_key, working).await;
        let effective = enhanced.as_deref().unwrap_or(working);

        match self.resolve_image(effective).await {
            Ok(resolved) => {
                log::info!("✅ Image ready from '{}'", resolved.backend);
                GenerationResult::succeeded(original, resolved.image, enhanced, resolved.backend)
            }
            Err(e) => {
                log::error!("❌ Generation failed after {} backends: {}", self.backends.len(), e);
                let failure = FailureKind::AllServicesUnavailable;
                GenerationResult::failed(original, failure, failure.message_key().text(language))
                    .with_enhanced_prompt(enhanced)
            }
        }
    }

    /// Best effort: any failure yields `None` and the caller keeps its prompt.
    pub async fn enhance_prompt(&self, api_key: &str, prompt: &str) -> Option<String> {
        let enhancer = self.enhancer.as_ref()?;
        match enhancer.enhance(api_key, prompt).await {
            Ok(text) if !text.trim().is_empty() => {
                log::debug!("Enhanced prompt: {}", text);
                Some(text)
            }
            Ok(_) => {
                log::warn!("Prompt enhancement returned nothing, using original prompt");
                None
            }
            Err(e) => {
                log::warn!("Prompt enhancement failed, using original prompt: {}", e);
                None
            }
        }
    }

    /// Tries each backend in order, each bounded by the backend timeout.
    /// The first non-empty image wins.
    pub async fn resolve_image(&self, prompt: &str) -> Result<ResolvedImage> {
        for backend in &self.backends {
            let name = backend.name();
            let _timer = logger::timer(name);
            log::info!("🖼️  Trying image backend '{}'", name);

            match tokio::time::timeout(self.backend_timeout, backend.generate(prompt)).await {
                Ok(Ok(image)) if !image.is_empty() => {
                    return Ok(ResolvedImage {
                        image,
                        backend: name.to_string(),
                    });
                }
                Ok(Ok(_)) => log::warn!("Backend '{}' returned an empty image", name),
                Ok(Err(e)) => log::warn!("Backend '{}' failed: {}", name, e),
                Err(_) => log::warn!(
                    "Backend '{}' abandoned: {}",
                    name,
                    RimagenError::Timeout(self.backend_timeout.as_secs())
                ),
            }
        }

        Err(RimagenError::InternalError(
            "all image services are currently unavailable".into(),
        ))
    }
}
