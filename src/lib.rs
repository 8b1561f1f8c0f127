//! Generates appetizing food photos with Gemini's image model
//!
//! Sends a prompt describing a dish to the `generateContent` endpoint and
//! writes the first image in the response to disk.

pub mod ai;
pub mod error;
pub mod generator;
pub mod models;
pub mod prompts;

pub use error::{Error, Result};
pub use generator::ImageGenerator;
