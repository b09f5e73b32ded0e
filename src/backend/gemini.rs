//! Google Gemini `generateContent` transport.

use crate::backend::{BackendError, GenerativeBackend};
use async_trait::async_trait;
use keyring::Entry;
use serde_json::{json, Value};
use std::env;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Backend implementation over the Gemini REST API.
///
/// Structured output is requested through `generationConfig`
/// (`responseMimeType: application/json` plus the declared
/// `responseSchema`), so a healthy response body is already the bare JSON
/// panel array.
pub struct GeminiBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiBackend {
    /// Create a backend for `model` (e.g. `"gemini-2.5-flash"`), resolving
    /// the API key from the keyring first, then `GEMINI_API_KEY`.
    pub fn new(model: &str) -> crate::Result<Self> {
        let api_key = Self::get_api_key().ok_or(BackendError::MissingApiKey)?;
        Ok(Self::with_base_url(DEFAULT_BASE_URL, model, api_key)?)
    }

    /// Create a backend against an explicit base URL.
    ///
    /// This is primarily for testing with mock servers; production callers
    /// should use [`GeminiBackend::new`].
    pub fn with_base_url(
        base_url: impl Into<String>,
        model: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, BackendError> {
        // Minimal production-friendly defaults (env-overridable). The engine
        // itself imposes no timeout; this one belongs to the transport.
        let timeout_secs = env::var("STORYBOARD_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(120);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .pool_max_idle_per_host(
                env::var("STORYBOARD_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(8),
            )
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.into(),
        })
    }

    fn get_api_key() -> Option<String> {
        // 1. Try Keyring
        if let Ok(entry) = Entry::new("storyboard-engine", "gemini") {
            if let Ok(key) = entry.get_password() {
                return Some(key);
            }
        }

        // 2. Try Environment Variable
        env::var("GEMINI_API_KEY").ok()
    }

    /// Pull the generated text out of a `generateContent` response body.
    ///
    /// Multiple parts are concatenated; a missing candidate or empty part
    /// list is an [`BackendError::EmptyResponse`].
    fn extract_text(payload: &Value) -> Result<String, BackendError> {
        let parts = payload
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .ok_or(BackendError::EmptyResponse)?;

        let text: String = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
            .collect();

        if text.is_empty() {
            return Err(BackendError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    async fn generate(
        &self,
        prompt: &str,
        response_schema: &Value,
    ) -> Result<String, BackendError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema,
            },
        });

        // Correlation id. The provider may ignore it, but logs can link on it.
        let request_id = Uuid::new_v4().to_string();
        debug!(
            request_id = %request_id,
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            "dispatching generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("x-request-id", &request_id)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&raw)
                .ok()
                .and_then(|v| {
                    v.get("error")
                        .and_then(|e| e.get("message"))
                        .and_then(|m| m.as_str())
                        .map(str::to_string)
                })
                .unwrap_or(raw);
            warn!(request_id = %request_id, status = status.as_u16(), "generateContent failed");
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: Value = response.json().await?;
        Self::extract_text(&payload)
    }
}
