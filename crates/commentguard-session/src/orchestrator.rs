//! Request orchestration
//!
//! One moderation attempt per submission:
//! ```text
//! Idle --submit--> Submitting --ok--> Completed --acknowledge--> Idle
//!                             --err-> Failed    --acknowledge--> Idle
//! ```
//! Only the most recent attempt is live. Under [`OverlapPolicy::Supersede`] a
//! new submission cancels the in-flight one, whose outcome is discarded;
//! under [`OverlapPolicy::Reject`] the new submission fails with
//! `AlreadyInProgress`.

use commentguard_backends::{build_backend, ModerationBackend, ResponseParser};
use commentguard_core::{CommentText, Error, ModerationResult, Result, ToxicityScores};
use commentguard_policy::ModerationPolicy;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::AppConfig;

/// What to do with a submission that arrives while another is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Cancel the stale attempt and start the new one
    #[default]
    Supersede,
    /// Refuse the new submission
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Submitting,
    Completed,
    Failed,
}

/// Observable orchestrator state
#[derive(Debug, Clone)]
pub struct StateRecord {
    pub status: Status,

    /// Comment of the live (or last) attempt
    pub comment: Option<CommentText>,

    /// Last successful result; left untouched by failures
    pub result: Option<ModerationResult>,

    /// Message of the last failure
    pub error: Option<String>,

    /// Id of the live attempt
    pub attempt: u64,
}

impl StateRecord {
    fn idle() -> Self {
        Self {
            status: Status::Idle,
            comment: None,
            result: None,
            error: None,
            attempt: 0,
        }
    }
}

/// How a submission ended
#[derive(Debug)]
pub enum Outcome {
    /// Pipeline finished while the attempt was still live
    Completed(Moderated),

    /// Pipeline failed while the attempt was still live
    Failed { attempt: u64, error: Error },

    /// A newer submission replaced this one; nothing may be applied
    Superseded,
}

/// A comment that completed the pipeline while still live
#[derive(Debug, Clone)]
pub struct Moderated {
    pub attempt: u64,
    pub comment: CommentText,
    pub result: ModerationResult,
}

impl Moderated {
    /// Whether the caller should append the comment
    pub fn should_append(&self) -> bool {
        self.result.verdict.allowed
    }
}

/// Sequences backend call, parsing, validation, and decision
pub struct Orchestrator {
    backend: Arc<dyn ModerationBackend>,
    parser: ResponseParser,
    policy: ModerationPolicy,
    timeout: Duration,
    overlap: OverlapPolicy,
    state: Mutex<StateRecord>,
    live: watch::Sender<u64>,
}

impl Orchestrator {
    /// Create a new orchestrator
    pub fn new(
        backend: Arc<dyn ModerationBackend>,
        policy: ModerationPolicy,
        timeout: Duration,
        overlap: OverlapPolicy,
    ) -> Result<Self> {
        if timeout.is_zero() {
            return Err(Error::config("timeout must be greater than zero"));
        }

        let (live, _) = watch::channel(0);
        Ok(Self {
            backend,
            parser: ResponseParser::new()?,
            policy,
            timeout,
            overlap,
            state: Mutex::new(StateRecord::idle()),
            live,
        })
    }

    /// Build the backend and orchestrator described by a configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let timeout = config.timeout();
        let backend = build_backend(&config.backend, timeout)?;
        Self::new(backend, config.policy.clone(), timeout, config.overlap)
    }

    /// Moderate one comment.
    ///
    /// `Err` is reserved for pre-flight refusals: blank comments fail with
    /// `EmptyComment` without touching state or the backend, and overlapping
    /// submissions under [`OverlapPolicy::Reject`] fail with
    /// `AlreadyInProgress`. Everything past that point is an [`Outcome`].
    pub async fn submit(&self, text: &str) -> Result<Outcome> {
        let comment = match CommentText::new(text) {
            Ok(comment) => comment,
            Err(e) => {
                record_outcome(e.kind());
                return Err(e);
            }
        };

        let attempt = self.begin(&comment)?;
        let started = Instant::now();

        let mut live = self.live.subscribe();
        let outcome = tokio::select! {
            outcome = self.run_pipeline(&comment) => Some(outcome),
            _ = live.wait_for(|current| *current != attempt) => None,
        };

        metrics::histogram!("commentguard_moderation_latency_ms")
            .record(started.elapsed().as_secs_f64() * 1000.0);

        match outcome {
            Some(outcome) => Ok(self.finish(attempt, comment, outcome)),
            None => {
                debug!(attempt, "Cancelled superseded moderation attempt");
                record_outcome("superseded");
                Ok(Outcome::Superseded)
            }
        }
    }

    /// Return to `Idle` after the caller has consumed a completed or failed
    /// attempt.
    ///
    /// Returns false, leaving state untouched, if `attempt` is no longer the
    /// live one.
    pub fn acknowledge(&self, attempt: u64) -> bool {
        let mut state = self.state.lock();
        if state.attempt != attempt {
            return false;
        }
        if matches!(state.status, Status::Completed | Status::Failed) {
            state.status = Status::Idle;
            state.error = None;
        }
        true
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> StateRecord {
        self.state.lock().clone()
    }

    /// Scores of the last successful attempt
    pub fn last_scores(&self) -> Option<ToxicityScores> {
        self.state.lock().result.as_ref().map(|r| r.scores)
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    fn begin(&self, comment: &CommentText) -> Result<u64> {
        let mut state = self.state.lock();

        if state.status == Status::Submitting {
            match self.overlap {
                OverlapPolicy::Reject => {
                    debug!(live = state.attempt, "Rejecting overlapping submission");
                    record_outcome(Error::AlreadyInProgress.kind());
                    return Err(Error::AlreadyInProgress);
                }
                OverlapPolicy::Supersede => {
                    warn!(stale = state.attempt, "Superseding in-flight moderation attempt");
                }
            }
        }

        state.attempt += 1;
        state.status = Status::Submitting;
        state.comment = Some(comment.clone());
        state.error = None;
        let attempt = state.attempt;
        self.live.send_replace(attempt);

        debug!(attempt, chars = comment.char_count(), "Starting moderation attempt");
        Ok(attempt)
    }

    async fn run_pipeline(&self, comment: &CommentText) -> Result<ModerationResult> {
        let raw = tokio::time::timeout(self.timeout, self.backend.fetch(comment))
            .await
            .map_err(|_| {
                Error::network(format!(
                    "{} backend timed out after {}ms",
                    self.backend.name(),
                    self.timeout.as_millis()
                ))
            })??;

        let object = self.parser.extract(&raw)?;
        let scores = ToxicityScores::validate(&object)?;
        let verdict = self.policy.evaluate(&scores);

        Ok(ModerationResult { scores, verdict })
    }

    fn finish(
        &self,
        attempt: u64,
        comment: CommentText,
        outcome: Result<ModerationResult>,
    ) -> Outcome {
        let mut state = self.state.lock();

        if state.attempt != attempt {
            debug!(attempt, live = state.attempt, "Discarding superseded moderation outcome");
            record_outcome("superseded");
            return Outcome::Superseded;
        }

        match outcome {
            Ok(result) => {
                let (top, score) = result.scores.highest();
                info!(
                    attempt,
                    allowed = result.verdict.allowed,
                    reasons = ?result.verdict.reasons(),
                    top = top.key(),
                    score,
                    "Moderation verdict"
                );
                record_outcome(if result.verdict.allowed {
                    "allowed"
                } else {
                    "blocked"
                });

                state.status = Status::Completed;
                state.result = Some(result.clone());
                state.error = None;

                Outcome::Completed(Moderated {
                    attempt,
                    comment,
                    result,
                })
            }
            Err(e) => {
                warn!(attempt, error = %e, "Moderation attempt failed");
                record_outcome(e.kind());

                state.status = Status::Failed;
                state.error = Some(e.to_string());

                Outcome::Failed { attempt, error: e }
            }
        }
    }
}

fn record_outcome(outcome: &'static str) {
    metrics::counter!("commentguard_submissions_total", "outcome" => outcome).increment(1);
}
