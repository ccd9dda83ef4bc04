//! Backend trait and raw response types

use async_trait::async_trait;
use commentguard_core::{CommentText, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Trait for all moderation backends.
///
/// A backend performs exactly one request per call and never retries.
#[async_trait]
pub trait ModerationBackend: Send + Sync {
    /// Send the comment and return the backend's raw payload
    async fn fetch(&self, comment: &CommentText) -> Result<RawResponse>;

    /// Get the backend name
    fn name(&self) -> &str;

    /// Shape of the payloads this backend returns
    fn kind(&self) -> BackendKind;
}

/// Payload shape returned by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Chat-completions envelope with the scores embedded in message text
    Completion,
    /// Flat object keyed by category
    Classification,
}

/// Undecoded backend payload, tagged with its shape
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub kind: BackendKind,
    pub body: Value,
}

impl RawResponse {
    pub fn new(kind: BackendKind, body: Value) -> Self {
        Self { kind, body }
    }

    pub fn completion(body: Value) -> Self {
        Self::new(BackendKind::Completion, body)
    }

    pub fn classification(body: Value) -> Self {
        Self::new(BackendKind::Classification, body)
    }
}
