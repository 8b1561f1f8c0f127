use crate::models::DEFAULT_GEMINI_BASE_URL;
use crate::{Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Lightweight Gemini REST client.
///
/// The API key travels in the `key` query parameter, so transport errors are
/// stripped of their URL before they are logged or returned.
pub struct GeminiHttpClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiHttpClient {
    /// Construct a Gemini client.
    ///
    /// `model` should be the bare model ID (for example
    /// `gemini-2.0-flash-exp-image-generation`); a `models/` prefix is stripped.
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, model, timeout, Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();

        Self {
            client,
            api_key,
            model,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Returns the configured model ID without the `models/` prefix.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            tracing::debug!(
                "Gemini request timed out after {}s",
                self.timeout.as_secs()
            );
            return Error::AiProvider(format!(
                "Gemini request timed out after {}s",
                self.timeout.as_secs()
            ));
        }
        let e = e.without_url();
        tracing::debug!("Failed to send request to Gemini: {}", e);
        Error::Http(e)
    }

    /// Calls Gemini's `generateContent` endpoint.
    pub async fn generate_content<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        request: &Req,
    ) -> Result<Resp> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .timeout(self.timeout)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .map_err(|e| self.transport_error(e))?;
            tracing::debug!("Gemini API error (status {}): {}", status, error_text);
            return Err(Error::AiProvider(format!(
                "Gemini API error (status {}): {}",
                status, error_text
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!("Failed to parse Gemini response: {}\nBody: {}", e, body);
            Error::AiProvider(format!("Failed to parse Gemini response: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use crate::ai::gemini::types::GenerateContentResponse;
    use wiremock::matchers::{header, query_param};
    use wiremock::{MockServer, ResponseTemplate};

    fn make_client(server: &MockServer, timeout: Duration) -> GeminiHttpClient {
        GeminiHttpClient::new("secret-key".to_string(), "test-model".to_string(), timeout)
            .with_base_url(format!("{}/", server.uri()))
    }

    #[test]
    fn test_strips_models_prefix() {
        let client = GeminiHttpClient::new(
            "k".to_string(),
            "models/gemini-2.0-flash-exp-image-generation".to_string(),
            Duration::from_secs(60),
        );
        assert_eq!(client.model(), "gemini-2.0-flash-exp-image-generation");
        assert_eq!(client.timeout(), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_sends_key_as_query_param() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(query_param("key", "secret-key"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, Duration::from_secs(5));
        let response: GenerateContentResponse = client
            .generate_content(&serde_json::json!({}))
            .await
            .unwrap();
        assert!(response.candidates.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_includes_body() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
            .mount(&server)
            .await;

        let client = make_client(&server, Duration::from_secs(5));
        let err = client
            .generate_content::<_, GenerateContentResponse>(&serde_json::json!({}))
            .await
            .unwrap_err();

        match err {
            Error::AiProvider(msg) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("backend exploded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "candidates": [] }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = make_client(&server, Duration::from_secs(1));
        let err = client
            .generate_content::<_, GenerateContentResponse>(&serde_json::json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::AiProvider(ref msg) if msg.contains("timed out")));
    }

    #[tokio::test]
    async fn test_connection_error_does_not_leak_key() {
        // Nothing listens on the discard port.
        let client = GeminiHttpClient::new(
            "secret-key".to_string(),
            "test-model".to_string(),
            Duration::from_secs(5),
        )
        .with_base_url("http://127.0.0.1:9".to_string());

        let err = client
            .generate_content::<_, GenerateContentResponse>(&serde_json::json!({}))
            .await
            .unwrap_err();

        assert!(!err.to_string().contains("secret-key"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_provider_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"candidates\": ["))
            .mount(&server)
            .await;

        let client = make_client(&server, Duration::from_secs(5));
        let err = client
            .generate_content::<_, GenerateContentResponse>(&serde_json::json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::AiProvider(ref msg) if msg.starts_with("Failed to parse")));
    }
}
