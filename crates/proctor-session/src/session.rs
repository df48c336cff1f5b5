//! The test-taking attempt state machine.
//!
//! A [`Session`] drives a single attempt over a fixed question sequence.
//! Construction is the start transition: there is no `NotStarted` state,
//! and both timers begin at zero on the first question. The only terminal
//! state is `Completed`, reached by advancing past the last question,
//! which scores the attempt exactly once.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use proctor_core::model::{AnswerValue, Question, QuestionKind, QuestionView, TestDefinition};
use proctor_core::scoring::{score, ScoreCard};

use crate::sink::ResultsSink;

/// Errors raised by the session engine.
///
/// `AnswerTypeMismatch`, `NotReady`, and `AlreadyCompleted` are contract
/// violations between the driving surface and the engine, not expected
/// runtime paths; they are logged at error level and must not be silently
/// swallowed by callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Guards session start; validation should have caught this earlier.
    #[error("cannot start a session on a test with no questions")]
    EmptyTestDefinition,

    /// The captured value's shape does not match the current question.
    #[error("question '{question_id}' is {expected} but a {got} answer was captured")]
    AnswerTypeMismatch {
        question_id: String,
        expected: String,
        got: String,
    },

    /// `advance()` was invoked while `can_proceed()` is false.
    #[error("the current question has no usable answer yet")]
    NotReady,

    /// The attempt already reached its terminal state.
    #[error("the session is already completed")]
    AlreadyCompleted,
}

/// Where the attempt currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    InProgress { index: usize },
    Completed,
}

/// Elapsed seconds, overall and for the question on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    pub total: u64,
    pub current_question: u64,
}

/// The outcome handed to the results collaborator at completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedAttempt {
    pub score: ScoreCard,
    /// Every captured answer, keyed by question id.
    pub answers: HashMap<String, AnswerValue>,
    pub total_seconds: u64,
}

/// What an `advance()` call did.
#[derive(Debug, Clone)]
pub enum Advance {
    /// Moved on to the question at `index`.
    Continued { index: usize },
    /// Crossed the last question; the attempt is scored and terminal.
    Completed(CompletedAttempt),
}

/// One in-progress attempt over a test definition.
///
/// The definition is shared read-only; all mutable attempt state lives
/// here and is discarded with the session.
pub struct Session {
    definition: Arc<TestDefinition>,
    answers: HashMap<String, AnswerValue>,
    total_seconds: u64,
    question_seconds: u64,
    state: SessionState,
    sink: Option<Arc<dyn ResultsSink>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("definition", &self.definition)
            .field("answers", &self.answers)
            .field("total_seconds", &self.total_seconds)
            .field("question_seconds", &self.question_seconds)
            .field("state", &self.state)
            .field("sink", &self.sink.as_ref().map(|_| "<sink>"))
            .finish()
    }
}

impl Session {
    /// Start an attempt on question zero with both timers at zero.
    pub fn start(definition: Arc<TestDefinition>) -> Result<Self, SessionError> {
        if definition.question_count() == 0 {
            return Err(SessionError::EmptyTestDefinition);
        }

        Ok(Self {
            definition,
            answers: HashMap::new(),
            total_seconds: 0,
            question_seconds: 0,
            state: SessionState::InProgress { index: 0 },
            sink: None,
        })
    }

    /// Attach a sink that receives the completed attempt, fire-and-forget.
    pub fn with_sink(mut self, sink: Arc<dyn ResultsSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, SessionState::Completed)
    }

    pub fn definition(&self) -> &Arc<TestDefinition> {
        &self.definition
    }

    /// Captured answers so far, keyed by question id.
    pub fn answers(&self) -> &HashMap<String, AnswerValue> {
        &self.answers
    }

    pub fn elapsed(&self) -> Elapsed {
        Elapsed {
            total: self.total_seconds,
            current_question: self.question_seconds,
        }
    }

    /// Progress through the question sequence, as the taker sees it.
    pub fn progress_percent(&self) -> u8 {
        match self.state {
            SessionState::InProgress { index } => {
                let count = self.definition.question_count();
                (100.0 * (index + 1) as f64 / count as f64).round() as u8
            }
            SessionState::Completed => 100,
        }
    }

    /// The question on screen, with the correct answer stripped. `None`
    /// once the session is completed.
    pub fn current_question(&self) -> Option<QuestionView> {
        self.current().map(Question::view)
    }

    /// Advance one elapsed second. Driven by the ticker; never changes the
    /// question index and never fires after completion.
    pub fn tick(&mut self) {
        if matches!(self.state, SessionState::InProgress { .. }) {
            self.total_seconds += 1;
            self.question_seconds += 1;
        }
    }

    /// Store `value` as the answer to the current question, overwriting
    /// any prior value.
    pub fn capture_answer(&mut self, value: AnswerValue) -> Result<(), SessionError> {
        let (question_id, kind) = match self.current() {
            Some(question) => (question.id.clone(), question.kind),
            None => {
                tracing::error!("answer captured after completion");
                return Err(SessionError::AlreadyCompleted);
            }
        };

        if !value.matches_kind(kind) {
            let err = SessionError::AnswerTypeMismatch {
                question_id,
                expected: kind.to_string(),
                got: shape_of(&value).to_string(),
            };
            tracing::error!(%err, "UI out of sync with session state");
            return Err(err);
        }

        self.answers.insert(question_id, value);
        Ok(())
    }

    /// Whether the current question has a usable answer: non-blank text
    /// for `input`, a selected option for `single`, at least one selection
    /// for `multiple`.
    pub fn can_proceed(&self) -> bool {
        let Some(question) = self.current() else {
            return false;
        };

        match self.answers.get(&question.id) {
            None => false,
            Some(AnswerValue::Text(text)) => match question.kind {
                QuestionKind::Input => !text.trim().is_empty(),
                _ => !text.is_empty(),
            },
            Some(AnswerValue::Selection(selected)) => !selected.is_empty(),
        }
    }

    /// Move to the next question, or complete and score the attempt when
    /// the current question is the last one.
    ///
    /// Requires `can_proceed()`; completion happens exactly once and later
    /// calls are rejected without re-scoring.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        let SessionState::InProgress { index } = self.state else {
            tracing::error!("advance invoked on a completed session");
            return Err(SessionError::AlreadyCompleted);
        };

        if !self.can_proceed() {
            tracing::error!(index, "advance invoked without a usable answer");
            return Err(SessionError::NotReady);
        }

        if index + 1 < self.definition.question_count() {
            // Answers are keyed by question id, so anything captured for
            // the next question on an earlier visit is still there.
            self.state = SessionState::InProgress { index: index + 1 };
            self.question_seconds = 0;
            return Ok(Advance::Continued { index: index + 1 });
        }

        self.state = SessionState::Completed;
        let card = score(&self.definition, &self.answers);
        let attempt = CompletedAttempt {
            score: card,
            answers: self.answers.clone(),
            total_seconds: self.total_seconds,
        };

        self.dispatch(&attempt);

        Ok(Advance::Completed(attempt))
    }

    /// Hand the outcome to the sink without waiting on it.
    fn dispatch(&self, attempt: &CompletedAttempt) {
        let Some(sink) = &self.sink else { return };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let sink = Arc::clone(sink);
                let attempt = attempt.clone();
                handle.spawn(async move {
                    sink.submit(&attempt).await;
                });
            }
            Err(_) => {
                tracing::debug!("no async runtime, results sink skipped");
            }
        }
    }

    fn current(&self) -> Option<&Question> {
        match self.state {
            SessionState::InProgress { index } => self.definition.question_at(index),
            SessionState::Completed => None,
        }
    }
}

fn shape_of(value: &AnswerValue) -> &'static str {
    match value {
        AnswerValue::Text(_) => "text",
        AnswerValue::Selection(_) => "selection",
    }
}
