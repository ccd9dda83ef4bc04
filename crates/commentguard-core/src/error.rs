//! Error types for CommentGuard

use std::fmt;
use std::time::Duration;

/// Result type alias using CommentGuard's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Text shown to the user whenever a submission fails after leaving the client.
pub const FAILED_TO_POST: &str = "Failed to post comment.";

/// Core error type for CommentGuard operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Blank or whitespace-only comment, rejected before any network call
    #[error("comment cannot be empty")]
    EmptyComment,

    /// A submission arrived while another one was still in flight
    #[error("a moderation attempt is already in progress")]
    AlreadyInProgress,

    /// Connection, transport, or timeout failure talking to the backend
    #[error("network error: {0}")]
    Network(String),

    /// Backend answered HTTP 429
    #[error("rate limited by moderation backend{}", format_retry_after(.retry_after))]
    RateLimited {
        /// Delay requested by the backend, if it sent one
        retry_after: Option<Duration>,
    },

    /// Backend answered with any other non-2xx status
    #[error("backend returned HTTP {status}: {message}")]
    Backend {
        /// HTTP status code
        status: u16,
        /// Response body excerpt
        message: String,
    },

    /// Backend payload could not be decoded into a JSON object
    #[error("parse error: {0}")]
    Parse(String),

    /// Decoded object failed score validation
    #[error("validation error: {}", format_issues(.0))]
    Validation(Vec<ValidationIssue>),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// File system errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a new backend error
    pub fn backend(status: u16, msg: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: msg.into(),
        }
    }

    /// Create a new parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Short machine-friendly name, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyComment => "empty_comment",
            Self::AlreadyInProgress => "already_in_progress",
            Self::Network(_) => "network",
            Self::RateLimited { .. } => "rate_limited",
            Self::Backend { .. } => "backend",
            Self::Parse(_) => "parse",
            Self::Validation(_) => "validation",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
        }
    }

    /// The notice a user sees for this error.
    ///
    /// Every failure past the pre-flight checks collapses into one message.
    pub fn user_notice(&self) -> &'static str {
        match self {
            Self::EmptyComment => "Comment cannot be empty.",
            Self::AlreadyInProgress => "Please wait, your previous comment is still being checked.",
            _ => FAILED_TO_POST,
        }
    }
}

/// A single problem found while validating a score object
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// Wire key of the offending category
    pub key: String,

    /// What was wrong with it
    pub kind: IssueKind,
}

impl ValidationIssue {
    pub fn new(key: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            key: key.into(),
            kind,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    Missing,
    NotNumeric,
    NotFinite,
    OutOfRange(f64),
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "is missing"),
            Self::NotNumeric => write!(f, "is not a number"),
            Self::NotFinite => write!(f, "is not finite"),
            Self::OutOfRange(v) => write!(f, "is out of range [0, 1]: {}", v),
        }
    }
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_retry_after(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(d) => format!(" (retry after {}s)", d.as_secs()),
        None => String::new(),
    }
}
