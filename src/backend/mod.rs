//! Backend capability: the external generative service.
//!
//! The engine treats the backend as an opaque capability — given a prompt
//! and a response schema, return a text payload expected to parse as
//! schema-conforming JSON, or fail. No retries are issued against it; a
//! single failure surfaces directly as a user-visible error.

mod gemini;

pub use gemini::GeminiBackend;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a backend implementation.
#[derive(Debug, Error)]
pub enum BackendError {
    /// No API key could be resolved from the keyring or the environment.
    #[error("missing API key (keyring entry or GEMINI_API_KEY)")]
    MissingApiKey,

    /// Transport-level failure (connect, TLS, timeout, body read).
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The service answered successfully but carried no generated text.
    #[error("response carried no generated content")]
    EmptyResponse,
}

/// The generative backend capability.
///
/// `response_schema` declares the expected document shape (see
/// [`crate::schema::panel_array_schema`]); how strictly it is honored is the
/// backend's concern — the engine validates the returned payload either way.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        response_schema: &serde_json::Value,
    ) -> Result<String, BackendError>;
}
