//! AI service integration for image generation
//!
//! Provides the [`ImageGenerationService`] seam, its Gemini implementation,
//! and a mock for tests and local harnesses.

pub mod gemini;
pub mod mime;
pub mod mock;

pub use gemini::GeminiImageClient;
pub use mock::MockImageGenerationClient;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    /// Send `prompt` to the provider and return the decoded bytes of the
    /// first image in its response.
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>>;
}
