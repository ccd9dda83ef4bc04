//! CommentGuard Policy Engine
//!
//! Maps validated toxicity scores to an allow/block verdict.
//!
//! A category triggers when its score is strictly greater than its
//! threshold. Policies may be defined in YAML and specify:
//! - A default threshold applied to every category
//! - Optional per-category overrides

pub mod engine;
pub mod policy;

pub use engine::{decide, Threshold, DEFAULT_THRESHOLD};
pub use policy::ModerationPolicy;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::engine::{decide, Threshold};
    pub use crate::policy::ModerationPolicy;
}
