//! Backend configuration and construction

use commentguard_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::backend::ModerationBackend;
use crate::classification::ClassificationBackend;
use crate::completion::CompletionBackend;
use crate::lexicon::LexiconBackend;

/// Which backend to use and how to reach it
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Generative chat-completions API
    Completion {
        #[serde(default = "default_completion_endpoint")]
        endpoint: String,

        /// Bearer token
        #[serde(default)]
        api_key: String,

        #[serde(default = "default_model")]
        model: String,
    },

    /// Dedicated classification service
    Classification {
        #[serde(default = "default_classification_url")]
        base_url: String,
    },

    /// Offline word lists
    Lexicon,
}

impl BackendConfig {
    /// Short name of the selected backend
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Completion { .. } => "completion",
            Self::Classification { .. } => "classification",
            Self::Lexicon => "lexicon",
        }
    }

    /// Check that endpoints parse and credentials are present
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Completion {
                endpoint,
                api_key,
                model,
            } => {
                check_url(endpoint)?;
                if api_key.trim().is_empty() {
                    return Err(Error::config("completion backend requires an api_key"));
                }
                if model.trim().is_empty() {
                    return Err(Error::config("completion backend requires a model"));
                }
                Ok(())
            }
            Self::Classification { base_url } => check_url(base_url),
            Self::Lexicon => Ok(()),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::Classification {
            base_url: default_classification_url(),
        }
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completion {
                endpoint, model, ..
            } => f
                .debug_struct("Completion")
                .field("endpoint", endpoint)
                .field("api_key", &"<redacted>")
                .field("model", model)
                .finish(),
            Self::Classification { base_url } => f
                .debug_struct("Classification")
                .field("base_url", base_url)
                .finish(),
            Self::Lexicon => f.write_str("Lexicon"),
        }
    }
}

/// Build the configured backend.
///
/// The HTTP client is bounded by `timeout`, so a hung connection surfaces as a
/// network error.
pub fn build_backend(config: &BackendConfig, timeout: Duration) -> Result<Arc<dyn ModerationBackend>> {
    config.validate()?;

    let backend: Arc<dyn ModerationBackend> = match config {
        BackendConfig::Completion {
            endpoint,
            api_key,
            model,
        } => {
            info!("Using completion backend: {} ({})", endpoint, model);
            Arc::new(CompletionBackend::new(
                http_client(timeout)?,
                endpoint.clone(),
                api_key.clone(),
                model.clone(),
            ))
        }
        BackendConfig::Classification { base_url } => {
            info!("Using classification backend: {}", base_url);
            Arc::new(ClassificationBackend::new(http_client(timeout)?, base_url))
        }
        BackendConfig::Lexicon => {
            info!("Using offline lexicon backend");
            Arc::new(LexiconBackend::new()?)
        }
    };

    Ok(backend)
}

fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))
}

fn check_url(raw: &str) -> Result<()> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| Error::config(format!("invalid backend URL '{}': {}", raw, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::config(format!(
            "unsupported URL scheme '{}' in '{}'",
            other, raw
        ))),
    }
}

fn default_completion_endpoint() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "deepseek/deepseek-r1".to_string()
}

fn default_classification_url() -> String {
    "http://localhost:8000".to_string()
}
