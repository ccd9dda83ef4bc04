//! Response parsing
//!
//! Turns a raw backend payload into a flat category/value object. Completion
//! text goes through an explicit normalization step first: markdown fence
//! markers, backslashes, and line breaks are removed, then the remainder must
//! decode as a single JSON object or parsing fails.

use commentguard_core::{Error, Result};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::backend::{BackendKind, RawResponse};

/// Parser for raw backend payloads
#[derive(Debug, Clone)]
pub struct ResponseParser {
    fence_regex: Regex,
}

impl ResponseParser {
    /// Create a new response parser
    pub fn new() -> Result<Self> {
        Ok(Self {
            fence_regex: Regex::new(r"(?i)```(?:json)?")
                .map_err(|e| Error::config(format!("Failed to compile fence regex: {}", e)))?,
        })
    }

    /// Extract the candidate score object from a raw response
    pub fn extract(&self, raw: &RawResponse) -> Result<Map<String, Value>> {
        match raw.kind {
            BackendKind::Classification => match &raw.body {
                Value::Object(map) => Ok(map.clone()),
                other => Err(Error::parse(format!(
                    "classification payload is not an object: {}",
                    type_name(other)
                ))),
            },
            BackendKind::Completion => {
                let text = completion_text(&raw.body)?;
                self.parse_completion_text(&text)
            }
        }
    }

    /// Strip fences, backslashes, and line breaks from model output
    pub fn normalize(&self, text: &str) -> String {
        self.fence_regex
            .replace_all(text, "")
            .chars()
            .filter(|c| !matches!(c, '\\' | '\n' | '\r'))
            .collect()
    }

    /// Normalize model output and decode it as a JSON object
    pub fn parse_completion_text(&self, text: &str) -> Result<Map<String, Value>> {
        let cleaned = self.normalize(text);
        debug!(raw_len = text.len(), cleaned_len = cleaned.len(), "Normalized completion text");

        match serde_json::from_str::<Value>(cleaned.trim()) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(Error::parse(format!(
                "completion text decoded to {}, expected an object",
                type_name(&other)
            ))),
            Err(e) => Err(Error::parse(format!(
                "completion text is not valid JSON: {}",
                e
            ))),
        }
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new().expect("Failed to create response parser")
    }
}

#[derive(Debug, Deserialize)]
struct CompletionEnvelope {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// Pull `choices[0].message.content` out of a completion envelope
fn completion_text(body: &Value) -> Result<String> {
    let envelope = CompletionEnvelope::deserialize(body)
        .map_err(|e| Error::parse(format!("malformed completion envelope: {}", e)))?;

    envelope
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::parse("completion envelope has no choices"))?
        .message
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| Error::parse("completion message has no content"))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
