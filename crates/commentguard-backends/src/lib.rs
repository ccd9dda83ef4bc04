//! CommentGuard Backends
//!
//! Moderation backends that score a comment, and the parser that turns their
//! raw payloads into a flat category/value object.
//!
//! Two payload shapes are supported:
//! - Completion: a chat-completions envelope whose message text holds the
//!   scores as (possibly fenced and escaped) JSON
//! - Classification: a flat JSON object already keyed by category
//!
//! Three backends produce them:
//! - [`CompletionBackend`] for a chat-completions API
//! - [`ClassificationBackend`] for a dedicated `/api/v1/comment` service
//! - [`LexiconBackend`] for offline scoring with word lists

pub mod backend;
pub mod classification;
pub mod completion;
pub mod config;
mod http;
pub mod lexicon;
pub mod parser;

pub use backend::{BackendKind, ModerationBackend, RawResponse};
pub use classification::ClassificationBackend;
pub use completion::{build_prompt, CompletionBackend};
pub use config::{build_backend, BackendConfig};
pub use lexicon::LexiconBackend;
pub use parser::ResponseParser;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::backend::{BackendKind, ModerationBackend, RawResponse};
    pub use crate::config::{build_backend, BackendConfig};
    pub use crate::parser::ResponseParser;
}
