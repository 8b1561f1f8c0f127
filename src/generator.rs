//! Generate one food photo and store it on disk.

use crate::ai::mime::detect_image_mime;
use crate::ai::{GeminiImageClient, ImageGenerationService};
use crate::models::{Config, GenerationRequest, StoredImage};
use crate::Result;
use std::path::Path;
use tracing::{error, info};

/// Renders the prompt, asks the image service for one image, and writes it
/// to the destination path.
pub struct ImageGenerator {
    image_gen: Box<dyn ImageGenerationService>,
}

impl ImageGenerator {
    /// Build a generator around any image service (tests inject mocks here).
    pub fn with_service(image_gen: Box<dyn ImageGenerationService>) -> Self {
        Self { image_gen }
    }

    pub fn from_config(config: &Config) -> Self {
        info!("Image provider: Gemini (model: {})", config.image_model);
        Self::with_service(Box::new(GeminiImageClient::from_config(config)))
    }

    /// Generate an image of `subject` and write it to `destination`.
    ///
    /// The parent directory of `destination` must already exist. An existing
    /// file is overwritten. Nothing is written unless an image was decoded.
    pub async fn try_generate(&self, subject: &str, destination: &Path) -> Result<StoredImage> {
        let prompt = GenerationRequest::food_photo(subject).prompt();

        info!("Generating image: {} ...", subject);
        let bytes = self.image_gen.generate_image(&prompt).await?;

        tokio::fs::write(destination, &bytes).await?;

        let stored = StoredImage {
            path: destination.to_path_buf(),
            size_bytes: bytes.len(),
            mime_type: detect_image_mime(&bytes),
        };

        info!(
            "Image saved: {} ({:.0}KB, {})",
            stored.path.display(),
            stored.size_kb(),
            stored.mime_type.unwrap_or("unknown format")
        );

        Ok(stored)
    }

    /// Boolean form of [`try_generate`](Self::try_generate): failures are
    /// logged and reported as `false`.
    pub async fn generate(&self, subject: &str, destination: &Path) -> bool {
        match self.try_generate(subject, destination).await {
            Ok(_) => true,
            Err(e) => {
                error!("Image generation failed: {}", e);
                false
            }
        }
    }
}
