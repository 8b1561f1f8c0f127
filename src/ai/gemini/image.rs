use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentResponse, Part};
use crate::ai::ImageGenerationService;
use crate::models::Config;
use crate::{Error, Result};
use async_trait::async_trait;
use base64::Engine as _;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ImageRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: ImageGenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageGenerationConfig {
    response_modalities: Vec<String>,
}

pub struct GeminiImageClient {
    http: GeminiHttpClient,
}

impl GeminiImageClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(
            api_key,
            model,
            Duration::from_secs(crate::models::DEFAULT_TIMEOUT_SECS),
            reqwest::Client::new(),
        )
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, timeout, client),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new_with_client(
            config.gemini_api_key.clone(),
            config.image_model.clone(),
            config.request_timeout,
            reqwest::Client::new(),
        )
        .with_base_url(config.gemini_base_url.clone())
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn model(&self) -> &str {
        self.http.model()
    }

    fn build_request(prompt: &str) -> ImageRequest {
        ImageRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part::Text {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: ImageGenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
            },
        }
    }

    /// Decode the first inline image in the response, if any.
    fn extract_image(response: &GenerateContentResponse) -> Result<Vec<u8>> {
        let image_data = response.first_inline_data()?.ok_or(Error::NoImage)?;

        tracing::debug!(
            "Gemini returned image with mime_type: {}",
            image_data.mime_type.as_deref().unwrap_or("unspecified")
        );

        base64::engine::general_purpose::STANDARD
            .decode(&image_data.data)
            .map_err(|e| Error::AiProvider(format!("Failed to decode Gemini base64 image: {}", e)))
    }
}

#[async_trait]
impl ImageGenerationService for GeminiImageClient {
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>> {
        let request = Self::build_request(prompt);

        tracing::debug!("Sending image request to Gemini (model: {})", self.model());
        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        Self::extract_image(&response)
    }
}
