use std::env;
use std::path::PathBuf;

pub const DEFAULT_ENHANCER_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_ENHANCER_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_FORM_URL: &str = "https://clipdrop-api.co/text-to-image/v1";
pub const DEFAULT_REDIRECT_BASE_URL: &str = "https://image.pollinations.ai";
pub const DEFAULT_STABILITY_URL: &str =
    "https://api.stability.ai/v1/generation/stable-diffusion-xl-1024-v1-0/text-to-image";
pub const DEFAULT_ALTERNATE_MODEL: &str = "flux";

#[derive(Debug, Clone)]
pub struct EnhancerConfig {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        EnhancerConfig {
            enabled: true,
            base_url: DEFAULT_ENHANCER_BASE_URL.to_string(),
            model: DEFAULT_ENHANCER_MODEL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl EnhancerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self.model = model.into();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Endpoints and credentials of the networked image services, in fallback order.
#[derive(Debug, Clone)]
pub struct BackendEndpoints {
    pub form_url: String,
    pub form_api_key: Option<String>,
    pub redirect_base_url: String,
    pub stability_url: String,
    pub stability_api_key: Option<String>,
    pub alternate_model: String,
}

impl Default for BackendEndpoints {
    fn default() -> Self {
        BackendEndpoints {
            form_url: DEFAULT_FORM_URL.to_string(),
            form_api_key: None,
            redirect_base_url: DEFAULT_REDIRECT_BASE_URL.to_string(),
            stability_url: DEFAULT_STABILITY_URL.to_string(),
            stability_api_key: None,
            alternate_model: DEFAULT_ALTERNATE_MODEL.to_string(),
        }
    }
}

impl BackendEndpoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form(mut self, url: impl Into<String>, api_key: Option<String>) -> Self {
        self.form_url = url.into();
        self.form_api_key = api_key;
        self
    }

    pub fn with_redirect(mut self, base_url: impl Into<String>) -> Self {
        self.redirect_base_url = base_url.into();
        self
    }

    pub fn with_stability(mut self, url: impl Into<String>, api_key: Option<String>) -> Self {
        self.stability_url = url.into();
        self.stability_api_key = api_key;
        self
    }
}

#[derive(Debug, Clone)]
pub struct PlaceholderConfig {
    pub width: u32,
    pub height: u32,
    pub font_path: Option<PathBuf>,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        PlaceholderConfig {
            width: 512,
            height: 512,
            font_path: None,
        }
    }
}

impl PlaceholderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_font(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Explicit path, or `<config dir>/rimagen/preferences.json`.
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rimagen")
            .join("preferences.json")
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub enhancer: EnhancerConfig,
    pub backends: BackendEndpoints,
    pub placeholder: PlaceholderConfig,
    pub store: StoreConfig,
    pub image_width: u32,
    pub image_height: u32,
    pub backend_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            enhancer: EnhancerConfig::default(),
            backends: BackendEndpoints::default(),
            placeholder: PlaceholderConfig::default(),
            store: StoreConfig::default(),
            image_width: 1024,
            image_height: 1024,
            backend_timeout_secs: 60,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(url) = env::var("RIMAGEN_ENHANCER_URL") {
            config.enhancer.base_url = url;
        }
        if let Ok(model) = env::var("RIMAGEN_ENHANCER_MODEL") {
            config.enhancer.model = model;
        }
        config.enhancer.enabled = env::var("RIMAGEN_ENHANCE")
            .ok()
            .map_or(true, |val| val != "false" && val != "0");

        if let Ok(url) = env::var("RIMAGEN_FORM_URL") {
            config.backends.form_url = url;
        }
        config.backends.form_api_key = env::var("RIMAGEN_FORM_API_KEY").ok();
        if let Ok(url) = env::var("RIMAGEN_REDIRECT_URL") {
            config.backends.redirect_base_url = url;
        }
        if let Ok(url) = env::var("RIMAGEN_STABILITY_URL") {
            config.backends.stability_url = url;
        }
        config.backends.stability_api_key = env::var("RIMAGEN_STABILITY_API_KEY").ok();

        config.placeholder.font_path = env::var("RIMAGEN_FONT_PATH").ok().map(PathBuf::from);
        config.store.path = env::var("RIMAGEN_STORE_PATH").ok().map(PathBuf::from);

        if let Some(secs) = env::var("RIMAGEN_BACKEND_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.backend_timeout_secs = secs;
        }

        config
    }

    pub fn with_enhancer(mut self, enhancer: EnhancerConfig) -> Self {
        self.enhancer = enhancer;
        self
    }

    pub fn with_backends(mut self, backends: BackendEndpoints) -> Self {
        self.backends = backends;
        self
    }

    pub fn with_placeholder(mut self, placeholder: PlaceholderConfig) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    pub fn with_image_size(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    pub fn with_backend_timeout(mut self, secs: u64) -> Self {
        self.backend_timeout_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_services() {
        let config = Config::default();
        assert!(config.enhancer.enabled);
        assert_eq!(config.backends.redirect_base_url, DEFAULT_REDIRECT_BASE_URL);
        assert_eq!(config.backend_timeout_secs, 60);
        assert!(config.backends.form_api_key.is_none());
    }

    #[test]
    fn store_path_prefers_explicit_value() {
        let store = StoreConfig::new().with_path("/tmp/prefs.json");
        assert_eq!(store.resolved_path(), PathBuf::from("/tmp/prefs.json"));
        let default_path = StoreConfig::new().resolved_path();
        assert!(default_path.ends_with("rimagen/preferences.json"));
    }

    #[test]
    fn builders_chain() {
        let config = Config::new()
            .with_image_size(256, 128)
            .with_backend_timeout(5)
            .with_enhancer(EnhancerConfig::new().disabled());
        assert_eq!((config.image_width, config.image_height), (256, 128));
        assert_eq!(config.backend_timeout_secs, 5);
        assert!(!config.enhancer.enabled);
    }
}
