//! Data models and configuration
//!
//! Defines the per-call generation request, the description of a stored
//! image, and the environment-driven configuration.

use crate::prompts;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-exp-image-generation";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Subject plus the template it is embedded into.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub subject: &'a str,
    pub template: &'a str,
}

impl<'a> GenerationRequest<'a> {
    pub fn food_photo(subject: &'a str) -> Self {
        Self {
            subject,
            template: prompts::FOOD_PHOTO,
        }
    }

    pub fn prompt(&self) -> String {
        prompts::render(self.template, &[("dish", self.subject)])
    }
}

/// An image written to disk by a successful generation.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredImage {
    pub path: PathBuf,
    pub size_bytes: usize,
    pub mime_type: Option<&'static str>,
}

impl StoredImage {
    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub image_model: String,
    pub gemini_base_url: String,
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup. Empty values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let gemini_api_key = get("GEMINI_API_KEY")
            .ok_or_else(|| crate::Error::Config("GEMINI_API_KEY not set".to_string()))?;

        let request_timeout = match get("GEMINI_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    crate::Error::Config(format!(
                        "GEMINI_TIMEOUT_SECS must be a positive integer (got '{}')",
                        raw
                    ))
                })?;
                if secs == 0 {
                    return Err(crate::Error::Config(
                        "GEMINI_TIMEOUT_SECS must be greater than zero".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            gemini_api_key,
            image_model: get("GEMINI_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            gemini_base_url: get("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            request_timeout,
        })
    }
}
