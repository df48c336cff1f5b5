//! Domain error types.
//!
//! Authoring failures (`InvalidQuestion`, `IncompletePublication`,
//! `InvalidGradingScale`) are recoverable: the editing surface reports them
//! inline and stays open for correction. `MalformedDefinition` is a
//! construction-time failure and the definition must not be used.

use thiserror::Error;

/// A test definition that violates a structural invariant.
///
/// Raised when constructing a [`crate::model::TestDefinition`]; the value is
/// rejected outright rather than produced partially valid.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MalformedDefinition {
    /// Two questions share the same id.
    #[error("duplicate question id '{question_id}'")]
    DuplicateQuestionId { question_id: String },

    /// An option appears more than once in a question's option list.
    #[error("question '{question_id}' lists option '{option}' more than once")]
    DuplicateOption { question_id: String, option: String },

    /// A choice question has no options to choose from.
    #[error("question '{question_id}' is a choice question with no options")]
    MissingOptions { question_id: String },

    /// A correct answer names a value that is not among the options.
    #[error("question '{question_id}' declares a correct answer outside its options")]
    CorrectAnswerNotInOptions { question_id: String },

    /// A multiple-choice question with an empty correct set.
    #[error("question '{question_id}' has an empty correct-answer set")]
    EmptyCorrectSet { question_id: String },

    /// The correct answer's shape does not match the question kind.
    #[error("question '{question_id}' pairs a {kind} question with a {got} answer")]
    AnswerShapeMismatch {
        question_id: String,
        kind: String,
        got: String,
    },

    /// A question worth zero points.
    #[error("question '{question_id}' must be worth at least one point")]
    ZeroPoints { question_id: String },

    /// The grading scale does not partition the percentage range.
    #[error("grading scale: {0}")]
    InvalidScale(#[from] InvalidGradingScale),
}

/// The first violated constraint of a question draft.
///
/// Validation is short-circuiting by design: the authoring surface shows one
/// "fill in the required field" message at a time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidQuestion {
    #[error("question text is required")]
    EmptyText,

    /// No non-blank option survives trimming.
    #[error("at least one non-blank answer option is required")]
    NoOptions,

    #[error("option '{0}' appears more than once")]
    DuplicateOption(String),

    /// The declared correct answer no longer references a surviving option.
    #[error("the correct answer no longer matches any option")]
    DanglingCorrectAnswer,

    /// A multiple-choice draft whose correct set is empty.
    #[error("select at least one correct option")]
    NoCorrectSelection,

    /// The correct answer's shape does not match the question kind.
    #[error("the correct answer shape does not match the question type")]
    WrongAnswerShape,

    /// Committing a draft that never declared a correct answer.
    #[error("a correct answer is required")]
    MissingCorrectAnswer,

    #[error("points must be at least 1")]
    ZeroPoints,
}

/// Why a draft definition cannot be published yet.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IncompletePublication {
    #[error("test title is required")]
    MissingTitle,

    #[error("test category is required")]
    MissingCategory,

    #[error("a test needs at least one question")]
    NoQuestions,
}

/// A grading scale whose bands fail to partition `[0, 100]`.
///
/// `Gap` and `Overlap` pinpoint the first offending percentage so the
/// authoring surface can highlight the boundary to fix.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum InvalidGradingScale {
    /// A band whose lower bound exceeds its upper bound.
    #[error("band {index} has its minimum above its maximum")]
    InvertedBand { index: usize },

    /// A band reaching past 100%.
    #[error("band {index} exceeds the 0-100 range")]
    OutOfRange { index: usize },

    /// A percentage no band covers.
    #[error("no band covers {at}%")]
    Gap { at: u8 },

    /// A percentage covered by more than one band.
    #[error("{at}% is covered by more than one band")]
    Overlap { at: u8 },
}
