//! Client for the Gemini `generateContent` endpoint.
//!
//! The client only moves JSON back and forth. Pulling the reply out of a response (and the
//! fallback when there is none) lives in [`extract_reply_text`] so callers can tell a
//! transport failure apart from an empty answer.

use crate::config::Settings;
use crate::core::error::ChatError;
use crate::infrastructure::traits::CompletionClient;
use async_trait::async_trait;
use di::Ref;
use log::{debug, warn};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;

/// Stored as the assistant reply whenever the provider answer carries no text.
pub const FALLBACK_REPLY: &str = "No response from Gemini";

#[derive(Serialize, Debug)]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<Content<'a>>,
}

#[derive(Serialize, Debug)]
pub struct Content<'a> {
    pub parts: Vec<Part<'a>>,
}

#[derive(Serialize, Debug)]
pub struct Part<'a> {
    pub text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    pub fn from_text(text: &'a str) -> Self {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text }],
            }],
        }
    }
}

/// Reads `candidates[0].content.parts[0].text`, or [`FALLBACK_REPLY`] if it isn't there.
pub fn extract_reply_text(response: &Value) -> String {
    match response
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
    {
        Some(text) => text.to_owned(),
        None => {
            warn!("completion response carried no candidate text, using fallback");
            FALLBACK_REPLY.to_owned()
        }
    }
}

pub struct GeminiClient {
    client: reqwest::Client,
    settings: Ref<Settings>,
}

impl GeminiClient {
    /// Header carrying the API key. Kept out of the URL so it never shows up in errors.
    const API_KEY_HEADER: &'static str = "x-goog-api-key";

    pub fn new(settings: Ref<Settings>) -> Result<GeminiClient, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.gemini_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(GeminiClient {
            client: builder.build()?,
            settings,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.gemini_base_url, self.settings.gemini_model
        )
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn generate_content(&self, text: &str) -> Result<Value, ChatError> {
        debug!(
            "sending {} chars to {}",
            text.len(),
            self.settings.gemini_model
        );

        let response = self
            .client
            .post(self.endpoint())
            .header(Self::API_KEY_HEADER, self.settings.gemini_api_key.expose_secret())
            .json(&GenerateContentRequest::from_text(text))
            .send()
            .await
            .map_err(|e| ChatError::Upstream(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("completion provider answered with {status}");
        }

        // a body that doesn't parse is a malformed answer, not a failed request
        Ok(response.json::<Value>().await.unwrap_or_else(|e| {
            warn!("completion response was not JSON: {e}");
            Value::Null
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_envelope_shape() {
        let body = serde_json::to_value(GenerateContentRequest::from_text("Hi")).unwrap();
        assert_eq!(body, json!({ "contents": [{ "parts": [{ "text": "Hi" }] }] }));
    }

    #[test]
    fn test_extract_first_candidate_text() {
        let response = json!({
            "candidates": [
                { "content": { "parts": [{ "text": "first" }, { "text": "second part" }] } },
                { "content": { "parts": [{ "text": "other candidate" }] } }
            ]
        });

        assert_eq!(extract_reply_text(&response), "first");
    }

    #[test]
    fn test_extract_falls_back_on_missing_candidates() {
        assert_eq!(extract_reply_text(&json!({})), FALLBACK_REPLY);
        assert_eq!(extract_reply_text(&json!({ "candidates": [] })), FALLBACK_REPLY);
        assert_eq!(extract_reply_text(&Value::Null), FALLBACK_REPLY);
    }

    #[test]
    fn test_extract_falls_back_on_non_string_text() {
        let response = json!({ "candidates": [{ "content": { "parts": [{ "text": 42 }] } }] });
        assert_eq!(extract_reply_text(&response), FALLBACK_REPLY);
    }

    #[test]
    fn test_endpoint_uses_configured_model() {
        let mut settings = Settings::new("key");
        settings.gemini_base_url = "http://localhost:9999".to_owned();
        settings.gemini_model = "gemini-test".to_owned();

        let client = GeminiClient::new(Ref::new(settings)).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_new_honours_configured_timeout() {
        let mut settings = Settings::new("key");
        settings.gemini_timeout = Some(std::time::Duration::from_secs(5));

        assert!(GeminiClient::new(Ref::new(settings)).is_ok());
    }
}
