//! Generation client module for talking to a text-generation service.
//!
//! This module provides a trait-based abstraction over providers, with
//! Google Gemini as the primary implementation and OpenRouter as an
//! OpenAI-compatible alternative. Every call is a single blocking
//! request-response: no streaming, no retry.

mod error;
mod gemini;
mod openrouter;
#[cfg(test)]
pub(crate) mod scripted;

pub use error::{classify_http_status, mentions_quota, GenerationError, GenerationErrorKind};
pub use gemini::GeminiClient;
pub use openrouter::OpenRouterClient;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Config, Provider};

/// Fixed prompt used to check that the service is reachable.
pub const PROBE_PROMPT: &str = "Hello, Gemini! Respond with 'API is working'.";

/// Trait for generation service clients.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Short human-readable provider name, used to label collected facts.
    fn name(&self) -> &str;

    /// Submit a prompt and return the raw response text.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Shared client handle.
pub type SharedClient = Arc<dyn GenerationClient>;

/// Build the client selected by configuration.
pub fn client_from_config(config: &Config) -> SharedClient {
    match config.provider {
        Provider::Gemini => Arc::new(GeminiClient::new(
            config.api_key.clone(),
            config.model.clone(),
        )),
        Provider::OpenRouter => Arc::new(OpenRouterClient::new(
            config.api_key.clone(),
            config.model.clone(),
        )),
    }
}

/// Send the probe prompt and return the trimmed reply.
pub async fn probe(client: &dyn GenerationClient) -> Result<String, GenerationError> {
    let reply = client.generate(PROBE_PROMPT).await?;
    Ok(reply.trim().to_string())
}
