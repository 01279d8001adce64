//! Errors surfaced to the user by session operations.
//!
//! Malformed service output is never one of these: it is absorbed by the
//! response interpreter.

use thiserror::Error;

use crate::llm::GenerationError;
use crate::task::{EmptyFieldError, TaskId};

#[derive(Debug, Error)]
pub enum ActionError {
    /// A required user input was empty. Nothing was changed.
    #[error(transparent)]
    EmptyField(#[from] EmptyFieldError),

    /// A required free-text input (topic, chat message) was empty.
    #[error("{0}")]
    EmptyInput(&'static str),

    #[error("Task {0} not found")]
    TaskNotFound(TaskId),

    /// The generation service failed. State was left as it was.
    #[error("{message}")]
    Service {
        message: String,
        #[source]
        source: GenerationError,
    },
}

impl ActionError {
    /// Wrap a service failure. `action` names what was being done, e.g.
    /// "generating plan".
    pub fn service(action: &str, source: GenerationError) -> Self {
        Self::Service {
            message: source.user_message(action),
            source,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyField(_) | Self::EmptyInput(_))
    }

    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::Service { source, .. } if source.is_quota_exceeded())
    }
}
