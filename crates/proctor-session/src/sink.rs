//! Fire-and-forget delivery of completed attempts.
//!
//! The engine hands the outcome to a [`ResultsSink`] at the `Completed`
//! transition and never waits on or retries the submission; persistence
//! and display are the collaborator's problem.

use async_trait::async_trait;

use crate::session::CompletedAttempt;

/// Receives the outcome of a completed attempt.
#[async_trait]
pub trait ResultsSink: Send + Sync {
    async fn submit(&self, attempt: &CompletedAttempt);
}

/// Default sink: records the outcome in the log and nothing else.
pub struct LoggingSink;

#[async_trait]
impl ResultsSink for LoggingSink {
    async fn submit(&self, attempt: &CompletedAttempt) {
        tracing::info!(
            raw = attempt.score.raw,
            attainable = attempt.score.attainable,
            percentage = attempt.score.percentage,
            grade = %attempt.score.grade,
            total_seconds = attempt.total_seconds,
            "attempt completed"
        );
    }
}
