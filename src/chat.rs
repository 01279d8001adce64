//! Direct chat with the generation service.

use serde::{Deserialize, Serialize};

use crate::error::ActionError;
use crate::llm::GenerationClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Chat turns in order. Each prompt is sent on its own; earlier turns are
/// kept for display only.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Record a completed turn.
    pub fn push_turn(&mut self, prompt: String, reply: String) {
        self.messages.push(ChatMessage::new(Role::User, prompt));
        self.messages.push(ChatMessage::new(Role::Assistant, reply));
    }
}

/// Ask the service one question and return its reply.
pub async fn ask(client: &dyn GenerationClient, prompt: &str) -> Result<String, ActionError> {
    if prompt.trim().is_empty() {
        return Err(ActionError::EmptyInput("Please enter a message."));
    }
    client
        .generate(prompt)
        .await
        .map_err(|e| ActionError::service("contacting the model", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::scripted::ScriptedClient;

    #[tokio::test]
    async fn test_ask_returns_reply() {
        let client = ScriptedClient::new().reply("Paris");
        assert_eq!(ask(&client, "Capital of France?").await.unwrap(), "Paris");
        assert_eq!(client.prompts(), vec!["Capital of France?"]);
    }

    #[tokio::test]
    async fn test_blank_prompt_is_not_sent() {
        let client = ScriptedClient::new();
        assert!(ask(&client, "  ").await.unwrap_err().is_validation());
        assert!(client.prompts().is_empty());
    }

    #[test]
    fn test_history_serializes_roles() {
        let mut history = ChatHistory::new();
        history.push_turn("hi".to_string(), "hello".to_string());
        let value = serde_json::to_value(&history).unwrap();
        assert_eq!(value[0]["role"], "user");
        assert_eq!(value[1]["role"], "assistant");
        assert_eq!(value[1]["content"], "hello");
    }
}
