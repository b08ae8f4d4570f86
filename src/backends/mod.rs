//! Independent ways of turning a prompt into an image, tried in order by
//! [`crate::client::ImageGenerationClient`].

pub mod form;
pub mod placeholder;
pub mod probe;
pub mod redirect;
pub mod stability;

use crate::{error::Result, models::ImageReference};
use async_trait::async_trait;
use rand::Rng;

pub use form::FormBackend;
pub use placeholder::PlaceholderBackend;
pub use redirect::RedirectBackend;
pub use stability::StabilityBackend;

#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Stable identifier used in logs and results.
    fn name(&self) -> &str;

    /// Produces a verified image or reports why it could not.
    async fn generate(&self, prompt: &str) -> Result<ImageReference>;
}

pub(crate) fn random_seed() -> u32 {
    rand::thread_rng().gen_range(0..1_000_000)
}
