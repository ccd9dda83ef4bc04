//! Core types for CommentGuard

use crate::category::ToxicityCategory;
use crate::scores::ToxicityScores;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A chat message sent to a completion backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

/// Allow/block outcome for one set of scores
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModerationVerdict {
    /// False iff at least one category exceeded its threshold
    pub allowed: bool,

    /// Every category that exceeded its threshold
    pub triggering_categories: BTreeSet<ToxicityCategory>,
}

impl ModerationVerdict {
    /// Build a verdict from the set of triggering categories
    pub fn from_triggers(triggering_categories: BTreeSet<ToxicityCategory>) -> Self {
        Self {
            allowed: triggering_categories.is_empty(),
            triggering_categories,
        }
    }

    /// Display labels of the triggering categories, in canonical order
    pub fn reasons(&self) -> Vec<&'static str> {
        self.triggering_categories.iter().map(|c| c.label()).collect()
    }
}

/// Scores plus verdict for a single submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModerationResult {
    pub scores: ToxicityScores,
    pub verdict: ModerationVerdict,
}
