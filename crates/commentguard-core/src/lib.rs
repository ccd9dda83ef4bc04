//! CommentGuard Core
//!
//! Core types and utilities shared across CommentGuard components.
//!
//! This crate provides:
//! - The closed set of toxicity categories and their display labels
//! - The validated toxicity score record and its validator
//! - Verdict and result types produced by the moderation pipeline
//! - Error types and result handling

pub mod category;
pub mod comment;
pub mod error;
pub mod scores;
pub mod types;

pub use category::ToxicityCategory;
pub use comment::CommentText;
pub use error::{Error, IssueKind, Result, ValidationIssue};
pub use scores::ToxicityScores;
pub use types::{ChatMessage, ModerationResult, ModerationVerdict};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::category::ToxicityCategory;
    pub use crate::comment::CommentText;
    pub use crate::error::{Error, Result};
    pub use crate::scores::ToxicityScores;
    pub use crate::types::{ModerationResult, ModerationVerdict};
}
