//! Gemini generateContent wire client.
//!
//! A thin, typed client for the Google Generative Language REST API. It
//! knows nothing about sessions or prompts — it ships a list of
//! [`Content`] messages plus a [`GenerationConfig`] and hands back the first
//! candidate's text. Everything conversational (grounding, turn mapping,
//! rollback) lives in [`crate::summarize`] and [`crate::chat`].
//!
//! Wire contract:
//!
//! * `POST {base}/{model}:generateContent?key={api_key}` — the key travels
//!   as a query parameter.
//! * Body: `{contents: [{role, parts: [{text}]}], generationConfig:
//!   {maxOutputTokens, temperature}}` with roles `"user"` and `"model"`.
//! * Success envelope: `{candidates: [{content: {parts: [{text}]}}]}`.
//! * Error envelope: `{error: {message}}`.
//!
//! No timeout and no cancellation are configured: a request runs to
//! completion (success or error) or the process is torn down.

use crate::error::GenerateError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default model. The `-flash` tier is cheap and more than adequate for
/// summarize-and-extract workloads.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Role string for user messages.
pub const ROLE_USER: &str = "user";

/// Role string for model (assistant) messages.
pub const ROLE_MODEL: &str = "model";

// ── Request types ────────────────────────────────────────────────────────

/// One message in the `contents` array.
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: ROLE_USER.to_string(),
            parts,
        }
    }

    pub fn model(parts: Vec<Part>) -> Self {
        Self {
            role: ROLE_MODEL.to_string(),
            parts,
        }
    }
}

/// A single text part.
#[derive(Debug, Clone, Serialize)]
pub struct Part {
    pub text: String,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Sampling parameters for one call.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

// ── Response types ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

// ── Client ───────────────────────────────────────────────────────────────

/// Client for the generateContent endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client with the default model and endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into().trim().to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create a client from the `GEMINI_API_KEY` environment variable.
    ///
    /// Returns `None` when the variable is unset or blank.
    pub fn from_env() -> Option<Self> {
        match std::env::var("GEMINI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Some(Self::new(key)),
            _ => None,
        }
    }

    /// Override the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the endpoint base URL. Used by tests to point the client at
    /// a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// True when a non-blank API key is configured. Operations check this
    /// before doing any work so a missing credential never costs a request.
    pub fn has_credential(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Check whether a key has valid Google API key format.
    ///
    /// Google API keys start with `"AIza"`. This is a pure format check and
    /// does not verify the key with the API; the CLI uses it to warn early
    /// on obviously wrong keys.
    pub fn is_valid_api_key_format(key: &str) -> bool {
        let trimmed = key.trim();
        !trimmed.is_empty() && trimmed.starts_with("AIza")
    }

    /// Send one generateContent call and return the reply text, trimmed.
    ///
    /// # Errors
    /// * [`GenerateError::MissingCredential`] — no API key; nothing is sent.
    /// * [`GenerateError::Api`] — transport failure or non-success status.
    ///   The message is the body's `error.message` when one was parseable,
    ///   otherwise `"API error: {status}"`.
    /// * [`GenerateError::EmptyResponse`] — HTTP success but no candidates,
    ///   no parts, or whitespace-only text.
    pub async fn generate(
        &self,
        contents: Vec<Content>,
        generation_config: GenerationConfig,
    ) -> Result<String, GenerateError> {
        if !self.has_credential() {
            return Err(GenerateError::MissingCredential);
        }

        let url = format!("{}/{}:generateContent", self.base_url, self.model);
        let body = GenerateContentRequest {
            contents,
            generation_config,
        };

        debug!(
            model = %self.model,
            messages = body.contents.len(),
            max_output_tokens = generation_config.max_output_tokens,
            "sending generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerateError::Api(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .ok()
                .and_then(|envelope| envelope.error)
                .map(|e| e.message)
                .unwrap_or_else(|| format!("API error: {status}"));
            warn!(%status, "generateContent failed: {message}");
            return Err(GenerateError::Api(message));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::Api(e.to_string()))?;

        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|content| content.parts.first())
            .map(|part| part.text.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            warn!("generateContent returned no candidate text");
            return Err(GenerateError::EmptyResponse);
        }

        debug!(reply_len = text.len(), "generateContent succeeded");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_wire_field_names() {
        let body = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text("hello")])],
            generation_config: GenerationConfig {
                max_output_tokens: 200,
                temperature: 0.7,
            },
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 200);
        assert!(json["generationConfig"]["temperature"].as_f64().unwrap() > 0.6);
    }

    #[test]
    fn model_role_maps_to_wire_value() {
        let content = Content::model(vec![Part::text("reply")]);
        assert_eq!(content.role, "model");
    }

    #[test]
    fn response_parsing_survives_missing_fields() {
        let parsed: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(parsed.candidates.is_empty());

        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"content": {"parts": []}}]}"#).unwrap();
        assert!(parsed.candidates[0]
            .content
            .as_ref()
            .unwrap()
            .parts
            .is_empty());
    }

    #[test]
    fn api_key_format_accepts_google_keys_only() {
        assert!(GeminiClient::is_valid_api_key_format("AIzaSyD12345abcdef"));
        assert!(GeminiClient::is_valid_api_key_format("  AIzaPadded  "));
        assert!(!GeminiClient::is_valid_api_key_format(""));
        assert!(!GeminiClient::is_valid_api_key_format("   "));
        assert!(!GeminiClient::is_valid_api_key_format("sk-openai-key"));
        assert!(!GeminiClient::is_valid_api_key_format("aiza-lowercase"));
    }

    #[test]
    fn blank_key_means_no_credential() {
        assert!(!GeminiClient::new("   ").has_credential());
        assert!(GeminiClient::new("AIzaSomething").has_credential());
    }

    #[tokio::test]
    async fn generate_without_credential_is_rejected_before_any_io() {
        // Unroutable base URL: if the client tried the network this would
        // produce a transport error, not MissingCredential.
        let client = GeminiClient::new("").with_base_url("http://127.0.0.1:1");
        let result = client
            .generate(
                vec![Content::user(vec![Part::text("hi")])],
                GenerationConfig {
                    max_output_tokens: 10,
                    temperature: 0.0,
                },
            )
            .await;
        assert!(matches!(result, Err(GenerateError::MissingCredential)));
    }
}
