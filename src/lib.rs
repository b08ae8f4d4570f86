//! Prompt-to-image generation with prompt enhancement, an ordered chain of
//! image backends and a locally rendered placeholder as the last resort.

pub mod backends;
pub mod client;
pub mod config;
pub mod controller;
pub mod enhancer;
pub mod error;
pub mod i18n;
pub mod logger;
pub mod models;
pub mod notify;
pub mod store;

pub use client::{ClientBuilder, ImageGenerationClient, ResolvedImage};
pub use config::Config;
pub use controller::{AppController, ControllerState, DocumentView, SubmitOutcome};
pub use error::{Result, RimagenError};
pub use i18n::{Language, MessageKey, Theme};
pub use models::{GenerationRequest, GenerationResult, HistoryEntry, ImageReference};
pub use notify::{NotificationCenter, Notifier, Severity};
pub use store::Preferences;
