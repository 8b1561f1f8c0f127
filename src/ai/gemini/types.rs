//! Gemini `generateContent` payload types.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Gemini content container used in both requests and responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Untagged union of inline media, text, and any other part shape.
///
/// Variant order matters for `#[serde(untagged)]` decoding: any part with an
/// `inlineData` key lands in one of the first two variants, even if it also
/// has other fields or its payload does not decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    MalformedInlineData {
        #[serde(rename = "inlineData")]
        inline_data: serde_json::Value,
    },
    Text {
        text: String,
    },
    Other(serde_json::Value),
}

impl Part {
    pub fn has_inline_data(&self) -> bool {
        matches!(
            self,
            Part::InlineData { .. } | Part::MalformedInlineData { .. }
        )
    }
}

/// Base64 inline payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub data: String,
}

/// Top-level `generateContent` response envelope.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// First part carrying `inlineData`, scanning candidates in order and
    /// parts in order. A malformed payload in that part is an error; later
    /// parts are never consulted.
    pub fn first_inline_data(&self) -> Result<Option<&InlineData>> {
        let part = self
            .candidates
            .iter()
            .flat_map(|candidate| candidate.content.parts.iter())
            .find(|part| part.has_inline_data());

        match part {
            Some(Part::InlineData { inline_data }) => Ok(Some(inline_data)),
            Some(Part::MalformedInlineData { inline_data }) => Err(Error::AiProvider(format!(
                "Malformed inlineData in Gemini response: {}",
                inline_data
            ))),
            _ => Ok(None),
        }
    }
}

/// Candidate completion item returned by Gemini.
#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
}
