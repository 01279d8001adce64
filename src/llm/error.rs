//! Error types for generation service calls.
//!
//! The service boundary distinguishes only two failure kinds: the caller's
//! quota or rate limit was hit, or something else went wrong. Neither is
//! retried; the user re-triggers the action.

use std::fmt;

use thiserror::Error;

/// Category of a generation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationErrorKind {
    /// Rate or billing limit signaled by the service.
    QuotaExceeded,
    /// Any other service-side or transport failure.
    Transient,
}

impl fmt::Display for GenerationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuotaExceeded => write!(f, "quota_exceeded"),
            Self::Transient => write!(f, "transient"),
        }
    }
}

/// A failed call to the generation service.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct GenerationError {
    pub kind: GenerationErrorKind,
    pub message: String,
}

impl GenerationError {
    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self {
            kind: GenerationErrorKind::QuotaExceeded,
            message: message.into(),
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: GenerationErrorKind::Transient,
            message: message.into(),
        }
    }

    /// Build an error from a free-form failure description, classifying it
    /// by its quota markers.
    pub fn from_description(message: impl Into<String>) -> Self {
        let message = message.into();
        if mentions_quota(&message) {
            Self::quota_exceeded(message)
        } else {
            Self::transient(message)
        }
    }

    /// Build an error from a non-success HTTP response.
    pub fn from_http(status: u16, body: &str) -> Self {
        let message = format!("HTTP {}: {}", status, body);
        match classify_http_status(status) {
            GenerationErrorKind::QuotaExceeded => Self::quota_exceeded(message),
            GenerationErrorKind::Transient => Self::from_description(message),
        }
    }

    pub fn is_quota_exceeded(&self) -> bool {
        self.kind == GenerationErrorKind::QuotaExceeded
    }

    /// Message suitable for showing to the user. `action` names what failed,
    /// e.g. "generating plan".
    pub fn user_message(&self, action: &str) -> String {
        match self.kind {
            GenerationErrorKind::QuotaExceeded => {
                "API quota exceeded. Please check your Google AI billing or wait for reset."
                    .to_string()
            }
            GenerationErrorKind::Transient => format!("Error {}: {}", action, self.message),
        }
    }
}

/// Classify an HTTP status code from the generation service.
pub fn classify_http_status(status: u16) -> GenerationErrorKind {
    match status {
        429 => GenerationErrorKind::QuotaExceeded,
        _ => GenerationErrorKind::Transient,
    }
}

/// Whether a failure description carries a quota marker.
pub fn mentions_quota(description: &str) -> bool {
    description.contains("429") || description.to_lowercase().contains("quota")
}
