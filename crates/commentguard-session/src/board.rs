//! Session comment board
//!
//! Owns the append-only list of accepted comments and turns orchestrator
//! outcomes into the notices a user sees.

use commentguard_core::{Error, ToxicityScores};
use parking_lot::Mutex;
use std::fmt;
use tracing::debug;

use crate::orchestrator::{Orchestrator, Outcome};

/// What the user is told after a submission
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Comment was appended
    Posted,

    /// Comment was scored and refused
    Blocked {
        /// Display labels of the triggering categories
        reasons: Vec<&'static str>,
        /// Full breakdown, so the user can see why
        scores: ToxicityScores,
    },

    /// Nothing to submit
    EmptyComment,

    /// Another submission is still being checked
    Busy,

    /// The pipeline failed; nothing was appended
    Failed {
        message: &'static str,
        detail: String,
    },

    /// A newer submission replaced this one before it finished
    Discarded,
}

impl Notice {
    /// Text shown to the user
    pub fn message(&self) -> &'static str {
        match self {
            Self::Posted => "Comment posted!",
            Self::Blocked { .. } => "Comment cannot be posted as it is flagged by our system.",
            Self::EmptyComment => Error::EmptyComment.user_notice(),
            Self::Busy => Error::AlreadyInProgress.user_notice(),
            Self::Failed { message, .. } => *message,
            Self::Discarded => "Comment was replaced by a newer submission.",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Session-scoped comment list guarded by the moderation pipeline
pub struct CommentBoard {
    orchestrator: Orchestrator,
    comments: Mutex<Vec<String>>,
}

impl CommentBoard {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator,
            comments: Mutex::new(Vec::new()),
        }
    }

    /// Moderate a comment and append it if allowed
    pub async fn post(&self, text: &str) -> Notice {
        match self.orchestrator.submit(text).await {
            Ok(Outcome::Completed(moderated)) => {
                if !self.orchestrator.acknowledge(moderated.attempt) {
                    return Notice::Discarded;
                }

                if moderated.should_append() {
                    let mut comments = self.comments.lock();
                    comments.push(moderated.comment.into_inner());
                    debug!(total = comments.len(), "Comment appended");
                    Notice::Posted
                } else {
                    Notice::Blocked {
                        reasons: moderated.result.verdict.reasons(),
                        scores: moderated.result.scores,
                    }
                }
            }
            Ok(Outcome::Failed { attempt, error }) => {
                if !self.orchestrator.acknowledge(attempt) {
                    return Notice::Discarded;
                }

                Notice::Failed {
                    message: error.user_notice(),
                    detail: error.to_string(),
                }
            }
            Ok(Outcome::Superseded) => Notice::Discarded,
            Err(Error::EmptyComment) => Notice::EmptyComment,
            Err(Error::AlreadyInProgress) => Notice::Busy,
            Err(e) => Notice::Failed {
                message: e.user_notice(),
                detail: e.to_string(),
            },
        }
    }

    /// Accepted comments, oldest first
    pub fn comments(&self) -> Vec<String> {
        self.comments.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.comments.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.lock().is_empty()
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }
}
