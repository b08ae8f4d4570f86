use thiserror::Error;

#[derive(Debug, Error)]
pub enum RimagenError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Backend '{backend}' failed: {reason}")]
    BackendError { backend: String, reason: String },
    #[error("Timed out after {0}s")]
    Timeout(u64),
    #[error("Internal error: {0}")]
    InternalError(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RimagenError {
    pub fn backend(backend: &str, reason: impl Into<String>) -> Self {
        RimagenError::BackendError {
            backend: backend.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for RimagenError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RimagenError::RequestError(format!("request timed out: {}", e))
        } else if e.is_decode() {
            RimagenError::ResponseError(e.to_string())
        } else {
            RimagenError::RequestError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for RimagenError {
    fn from(e: serde_json::Error) -> Self {
        RimagenError::SerializationError(e.to_string())
    }
}

impl From<image::ImageError> for RimagenError {
    fn from(e: image::ImageError) -> Self {
        RimagenError::ResponseError(format!("image decode failed: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, RimagenError>;
