//! Dedicated classification-service backend
//!
//! ```text
//! POST <base_url>/api/v1/comment
//! {"comment": "..."}
//! ```
//! The response is already a flat category/score object.

use async_trait::async_trait;
use commentguard_core::{CommentText, Result};
use serde::Serialize;
use tracing::debug;

use crate::backend::{BackendKind, ModerationBackend, RawResponse};
use crate::http::send_json;

/// Path of the comment scoring endpoint, relative to the service base URL
pub const COMMENT_PATH: &str = "/api/v1/comment";

/// Backend that calls a dedicated toxicity classifier
#[derive(Debug, Clone)]
pub struct ClassificationBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl ClassificationBackend {
    /// Create a backend for the service rooted at `base_url`
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), COMMENT_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug, Serialize)]
struct CommentRequest<'a> {
    comment: &'a str,
}

#[async_trait]
impl ModerationBackend for ClassificationBackend {
    async fn fetch(&self, comment: &CommentText) -> Result<RawResponse> {
        debug!(
            endpoint = %self.endpoint,
            chars = comment.char_count(),
            "Requesting classification scores"
        );

        let body = send_json(
            self.client.post(&self.endpoint).json(&CommentRequest {
                comment: comment.as_str(),
            }),
            self.name(),
        )
        .await?;

        Ok(RawResponse::classification(body))
    }

    fn name(&self) -> &str {
        "classification"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Classification
    }
}
