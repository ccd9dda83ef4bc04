//! Chat-completions moderation backend
//!
//! Sends a fixed instruction prompt embedding the comment and expects the
//! model to answer with the six category scores as raw JSON:
//! ```text
//! POST <endpoint>
//! Authorization: Bearer <api_key>
//! {"model": "...", "messages": [{"role": "user", "content": "<prompt>"}]}
//! ```

use async_trait::async_trait;
use commentguard_core::{ChatMessage, CommentText, Result};
use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::backend::{BackendKind, ModerationBackend, RawResponse};
use crate::http::send_json;

/// Build the instruction prompt for one comment
pub fn build_prompt(comment: &CommentText) -> String {
    format!(
        "Rate the following user comment from 0 to 1, to two decimal places, in each of \
these categories: toxic, severely_toxic, obscene, threat, insult, identity_hate.\n\
Treat this as a multi-class classification: only one category should score high at a \
time, but every category must still be given a value.\n\n\
Comment:\n{}\n\n\
Respond with raw JSON only, using exactly those six keys.",
        comment.as_str()
    )
}

/// Backend that asks a generative model to score the comment
pub struct CompletionBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl CompletionBackend {
    /// Create a new completion backend
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

impl fmt::Debug for CompletionBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionBackend")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[async_trait]
impl ModerationBackend for CompletionBackend {
    async fn fetch(&self, comment: &CommentText) -> Result<RawResponse> {
        let request = CompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage::user(build_prompt(comment))],
        };

        debug!(
            model = %self.model,
            chars = comment.char_count(),
            "Requesting completion scores"
        );

        let body = send_json(
            self.client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&request),
            self.name(),
        )
        .await?;

        Ok(RawResponse::completion(body))
    }

    fn name(&self) -> &str {
        "completion"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Completion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_comment_and_keys() {
        let comment = CommentText::new("I will hurt you").unwrap();
        let prompt = build_prompt(&comment);

        assert!(prompt.contains("I will hurt you"));
        for key in ["toxic", "severely_toxic", "obscene", "threat", "insult", "identity_hate"] {
            assert!(prompt.contains(key), "prompt missing {}", key);
        }
        assert!(prompt.contains("raw JSON"));
        assert!(prompt.contains("two decimal places"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let backend = CompletionBackend::new(
            reqwest::Client::new(),
            "http://localhost/chat/completions",
            "sk-secret",
            "deepseek/deepseek-r1",
        );
        let debug = format!("{:?}", backend);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
