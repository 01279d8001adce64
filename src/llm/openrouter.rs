//! OpenRouter chat completions client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::error::GenerationError;
use super::GenerationClient;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// OpenRouter API client. Sends each prompt as a single user message.
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenRouterClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl GenerationClient for OpenRouterClient {
    fn name(&self) -> &str {
        "OpenRouter"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = OpenRouterRequest {
            model: self.model.clone(),
            messages: vec![OpenRouterMessage {
                role: "user".to_string(),
                content: Some(prompt.to_string()),
            }],
        };

        tracing::debug!("Sending request to OpenRouter: model={}", self.model);

        let response = match self
            .client
            .post(OPENROUTER_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("X-Title", "Agentic Assist")
            .json(&request)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                if e.is_timeout() {
                    return Err(GenerationError::transient(format!("Request timeout: {}", e)));
                } else if e.is_connect() {
                    return Err(GenerationError::transient(format!("Connection failed: {}", e)));
                } else {
                    return Err(GenerationError::from_description(format!(
                        "Request failed: {}",
                        e
                    )));
                }
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let err = GenerationError::from_http(status.as_u16(), &body);
            tracing::error!("Request failed (not retried): {}", err);
            return Err(err);
        }

        let parsed: OpenRouterResponse = serde_json::from_str(&body).map_err(|e| {
            GenerationError::transient(format!("Failed to parse response: {}, body: {}", e, body))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::transient("No choices in response"))
    }
}

/// OpenRouter API request format.
#[derive(Debug, Serialize)]
struct OpenRouterRequest {
    model: String,
    messages: Vec<OpenRouterMessage>,
}

/// Message in an OpenRouter request or response.
#[derive(Debug, Serialize, Deserialize)]
struct OpenRouterMessage {
    #[serde(default)]
    role: String,
    content: Option<String>,
}

/// OpenRouter API response format.
#[derive(Debug, Deserialize)]
struct OpenRouterResponse {
    choices: Vec<OpenRouterChoice>,
}

/// A choice in the OpenRouter response.
#[derive(Debug, Deserialize)]
struct OpenRouterChoice {
    message: OpenRouterMessage,
}
