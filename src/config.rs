//! Configuration loaded from the process environment.
//!
//! A `.env` file in the working directory is loaded first (if present), then:
//! - `LLM_PROVIDER` - `gemini` (default) or `openrouter`
//! - `GOOGLE_API_KEY` - required when the provider is `gemini`
//! - `OPENROUTER_API_KEY` - required when the provider is `openrouter`
//! - `LLM_MODEL` - model identifier (default depends on provider)
//! - `HOST` / `PORT` - listen address (default `127.0.0.1:3000`)
//!
//! A missing credential is fatal: there is no built-in fallback key.

use std::fmt;

use thiserror::Error;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_OPENROUTER_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The API key for the selected provider is unset or blank.
    #[error("Please set your {var} environment variable")]
    MissingCredential { var: &'static str },

    /// A configuration variable has an invalid value.
    #[error("Invalid value for '{var}': {reason}")]
    InvalidValue { var: &'static str, reason: String },
}

/// Which generation service to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    OpenRouter,
}

impl Provider {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "openrouter" => Ok(Self::OpenRouter),
            other => Err(ConfigError::InvalidValue {
                var: "LLM_PROVIDER",
                reason: format!("unknown provider '{}' (expected gemini or openrouter)", other),
            }),
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn key_var(self) -> &'static str {
        match self {
            Self::Gemini => "GOOGLE_API_KEY",
            Self::OpenRouter => "OPENROUTER_API_KEY",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Self::Gemini => DEFAULT_GEMINI_MODEL,
            Self::OpenRouter => DEFAULT_OPENROUTER_MODEL,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::OpenRouter => write!(f, "openrouter"),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub provider: Provider,
    pub api_key: String,
    pub model: String,
    pub host: String,
    pub port: u16,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Load `.env` (if any) and read configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Failed to load .env file: {}", e),
        }
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let provider = match non_blank("LLM_PROVIDER") {
            Some(value) => Provider::parse(&value)?,
            None => Provider::Gemini,
        };

        let key_var = provider.key_var();
        let api_key = non_blank(key_var)
            .map(|k| k.trim().to_string())
            .ok_or(ConfigError::MissingCredential { var: key_var })?;

        let model = non_blank("LLM_MODEL").unwrap_or_else(|| provider.default_model().to_string());
        let host = non_blank("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match non_blank("PORT") {
            Some(value) => value.trim().parse().map_err(|e| ConfigError::InvalidValue {
                var: "PORT",
                reason: format!("{}", e),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            provider,
            api_key,
            model,
            host,
            port,
        })
    }
}
