//! CommentGuard Session
//!
//! Runs one moderation attempt per submission and keeps the session's list of
//! accepted comments.
//!
//! - [`Orchestrator`]: the `Idle -> Submitting -> {Completed, Failed} -> Idle`
//!   state machine, with timeout and supersession of stale attempts
//! - [`CommentBoard`]: appends allowed comments and turns outcomes into user notices
//! - [`AppConfig`]: YAML configuration with command-line overrides

pub mod board;
pub mod config;
pub mod orchestrator;

pub use board::{CommentBoard, Notice};
pub use config::{AppConfig, ConfigOverrides};
pub use orchestrator::{Moderated, Orchestrator, Outcome, OverlapPolicy, StateRecord, Status};
