//! Response interpretation with deterministic fallbacks.
//!
//! Model output is decoded strictly into the expected shape. Any decode or
//! shape error is absorbed: the caller gets the shape's fallback value,
//! tagged so it can tell a genuine answer from a substitution. Decode
//! errors are logged and never surfaced to the user.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// The structured shapes the service is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Plan,
    Report,
    ResearchPlan,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plan => write!(f, "plan"),
            Self::Report => write!(f, "report"),
            Self::ResearchPlan => write!(f, "research_plan"),
        }
    }
}

/// A type the service is asked to emit as a single JSON object.
pub trait Interpretable: DeserializeOwned {
    const SHAPE: Shape;
}

/// Outcome of interpreting a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "value", rename_all = "snake_case")]
pub enum Interpreted<T> {
    /// The response decoded into the expected shape.
    Decoded(T),
    /// The response could not be decoded; the fallback was substituted.
    DefaultedTo(T),
}

impl<T> Interpreted<T> {
    pub fn value(&self) -> &T {
        match self {
            Self::Decoded(v) | Self::DefaultedTo(v) => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Decoded(v) | Self::DefaultedTo(v) => v,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Self::DefaultedTo(_))
    }
}

/// Decode `raw` as `T`, substituting `fallback()` on any error.
///
/// `fallback` must depend only on stored inputs, never on what was partially
/// parsed from `raw`.
pub fn interpret<T, F>(raw: &str, fallback: F) -> Interpreted<T>
where
    T: Interpretable,
    F: FnOnce() -> T,
{
    match serde_json::from_str::<T>(strip_code_fence(raw)) {
        Ok(value) => Interpreted::Decoded(value),
        Err(e) => {
            tracing::warn!(shape = %T::SHAPE, error = %e, "Response did not decode, using default");
            Interpreted::DefaultedTo(fallback())
        }
    }
}

/// Remove one enclosing markdown code fence (```` ```json ... ``` ````), if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line.
    match body.find('\n') {
        Some(idx) => body[idx + 1..].trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Pair {
        a: String,
        b: u32,
    }

    impl Interpretable for Pair {
        const SHAPE: Shape = Shape::Plan;
    }

    fn fallback() -> Pair {
        Pair {
            a: "default".to_string(),
            b: 0,
        }
    }

    #[test]
    fn test_valid_json_decodes() {
        let result = interpret(r#"{"a": "x", "b": 2}"#, fallback);
        assert_eq!(
            result,
            Interpreted::Decoded(Pair {
                a: "x".to_string(),
                b: 2
            })
        );
    }

    #[test]
    fn test_missing_field_defaults() {
        let result = interpret(r#"{"a": "x"}"#, fallback);
        assert!(result.is_defaulted());
        assert_eq!(result.into_value(), fallback());
    }

    #[test]
    fn test_non_json_defaults() {
        let result = interpret("Sure! Here is your plan:", fallback);
        assert_eq!(result, Interpreted::DefaultedTo(fallback()));
    }

    #[test]
    fn test_code_fence_is_stripped() {
        let raw = "```json\n{\"a\": \"x\", \"b\": 1}\n```";
        assert!(!interpret(raw, fallback).is_defaulted());

        let raw = "```\n{\"a\": \"x\", \"b\": 1}\n```\n";
        assert!(!interpret(raw, fallback).is_defaulted());
    }

    #[test]
    fn test_unterminated_fence_is_left_alone() {
        assert_eq!(strip_code_fence("```json\n{}"), "```json\n{}");
    }
}
