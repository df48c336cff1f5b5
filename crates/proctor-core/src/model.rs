//! Core data model types for proctor.
//!
//! These are the fundamental types the entire system uses to represent
//! tests, questions, grading scales, and captured answers. A
//! [`TestDefinition`] can only be obtained through [`TestDefinition::new`],
//! which enforces every structural invariant; the rest of the workspace
//! treats it as immutable.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::authoring::validate_grading_scale;
use crate::error::{InvalidGradingScale, MalformedDefinition};

/// The three answer modalities a question can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Exactly one option is selected.
    Single,
    /// Any non-empty subset of options is selected.
    Multiple,
    /// Free-text entry, no options.
    Input,
}

impl QuestionKind {
    /// Whether questions of this kind carry an option list.
    pub fn has_options(self) -> bool {
        !matches!(self, QuestionKind::Input)
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::Single => write!(f, "single"),
            QuestionKind::Multiple => write!(f, "multiple"),
            QuestionKind::Input => write!(f, "input"),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" => Ok(QuestionKind::Single),
            "multiple" => Ok(QuestionKind::Multiple),
            "input" => Ok(QuestionKind::Input),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// An answer value, captured from a taker or declared as correct.
///
/// `Text` is the shape for `single` and `input` questions, `Selection` for
/// `multiple`. The set representation makes selection equality
/// order-irrelevant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Selection(BTreeSet<String>),
}

impl AnswerValue {
    pub fn text(value: impl Into<String>) -> Self {
        AnswerValue::Text(value.into())
    }

    pub fn selection<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AnswerValue::Selection(values.into_iter().map(Into::into).collect())
    }

    /// True when the value carries no usable content: blank text or an
    /// empty selection.
    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Text(t) => t.trim().is_empty(),
            AnswerValue::Selection(s) => s.is_empty(),
        }
    }

    /// Whether this value has the shape `kind` expects.
    pub fn matches_kind(&self, kind: QuestionKind) -> bool {
        match self {
            AnswerValue::Text(_) => !matches!(kind, QuestionKind::Multiple),
            AnswerValue::Selection(_) => matches!(kind, QuestionKind::Multiple),
        }
    }

    fn shape_name(&self) -> &'static str {
        match self {
            AnswerValue::Text(_) => "text",
            AnswerValue::Selection(_) => "selection",
        }
    }
}

/// One assessable item of a test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier, stable for the lifetime of the test.
    pub id: String,
    /// Prompt shown to the test-taker.
    pub text: String,
    /// Answer modality.
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Ordered options; empty for `input` questions.
    #[serde(default)]
    pub options: Vec<String>,
    /// Consumed by scoring only; stripped from every taker-facing view.
    pub correct_answer: AnswerValue,
    /// Positive weight toward the raw score.
    pub points: u32,
    /// Optional display asset reference, opaque to the core.
    #[serde(default)]
    pub image: Option<String>,
}

impl Question {
    /// Taker-facing projection with the correct answer removed.
    pub fn view(&self) -> QuestionView {
        QuestionView {
            id: self.id.clone(),
            text: self.text.clone(),
            kind: self.kind,
            options: self.options.clone(),
            points: self.points,
            image: self.image.clone(),
        }
    }

    /// Verify the question invariants: positive points, options present
    /// and duplicate-free for choice kinds, correct answer drawn from the
    /// options and shaped for the kind.
    pub(crate) fn check(&self) -> Result<(), MalformedDefinition> {
        if self.points == 0 {
            return Err(MalformedDefinition::ZeroPoints {
                question_id: self.id.clone(),
            });
        }

        if !self.correct_answer.matches_kind(self.kind) {
            return Err(MalformedDefinition::AnswerShapeMismatch {
                question_id: self.id.clone(),
                kind: self.kind.to_string(),
                got: self.correct_answer.shape_name().to_string(),
            });
        }

        if self.kind.has_options() {
            if self.options.is_empty() {
                return Err(MalformedDefinition::MissingOptions {
                    question_id: self.id.clone(),
                });
            }

            let mut seen = HashSet::new();
            for option in &self.options {
                if !seen.insert(option.as_str()) {
                    return Err(MalformedDefinition::DuplicateOption {
                        question_id: self.id.clone(),
                        option: option.clone(),
                    });
                }
            }

            match &self.correct_answer {
                AnswerValue::Text(value) => {
                    if !self.options.iter().any(|o| o == value) {
                        return Err(MalformedDefinition::CorrectAnswerNotInOptions {
                            question_id: self.id.clone(),
                        });
                    }
                }
                AnswerValue::Selection(values) => {
                    if values.is_empty() {
                        return Err(MalformedDefinition::EmptyCorrectSet {
                            question_id: self.id.clone(),
                        });
                    }
                    if !values.iter().all(|v| self.options.iter().any(|o| o == v)) {
                        return Err(MalformedDefinition::CorrectAnswerNotInOptions {
                            question_id: self.id.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

/// What the taker-facing surface is allowed to see of a [`Question`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub options: Vec<String>,
    pub points: u32,
    pub image: Option<String>,
}

/// One band of a grading scale: an inclusive percentage range mapped to a
/// grade label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradingCriterion {
    pub min_points: u8,
    pub max_points: u8,
    pub grade: String,
    pub description: String,
}

impl GradingCriterion {
    pub fn new(
        min_points: u8,
        max_points: u8,
        grade: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            min_points,
            max_points,
            grade: grade.into(),
            description: description.into(),
        }
    }

    /// Whether `percentage` falls inside this band (bounds inclusive).
    pub fn contains(&self, percentage: u8) -> bool {
        self.min_points <= percentage && percentage <= self.max_points
    }
}

/// A validated grading scale: bands that partition `[0, 100]` with no gaps
/// and no overlaps, so every attainable percentage resolves to exactly one
/// grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GradingCriterion>", into = "Vec<GradingCriterion>")]
pub struct GradingScale(Vec<GradingCriterion>);

impl GradingScale {
    pub fn new(bands: Vec<GradingCriterion>) -> Result<Self, InvalidGradingScale> {
        validate_grading_scale(&bands)?;
        Ok(Self(bands))
    }

    pub fn bands(&self) -> &[GradingCriterion] {
        &self.0
    }

    /// Resolve a percentage to its band. Total on every constructed scale.
    pub fn resolve(&self, percentage: u8) -> &GradingCriterion {
        self.0
            .iter()
            .find(|band| band.contains(percentage))
            .unwrap_or_else(|| unreachable!("constructed scales cover every percentage"))
    }
}

impl Default for GradingScale {
    /// The stock four-band school scale seeded into every new test.
    fn default() -> Self {
        Self(vec![
            GradingCriterion::new(85, 100, "5", "Excellent"),
            GradingCriterion::new(70, 84, "4", "Good"),
            GradingCriterion::new(50, 69, "3", "Satisfactory"),
            GradingCriterion::new(0, 49, "2", "Unsatisfactory"),
        ])
    }
}

impl TryFrom<Vec<GradingCriterion>> for GradingScale {
    type Error = InvalidGradingScale;

    fn try_from(bands: Vec<GradingCriterion>) -> Result<Self, Self::Error> {
        GradingScale::new(bands)
    }
}

impl From<GradingScale> for Vec<GradingCriterion> {
    fn from(scale: GradingScale) -> Self {
        scale.0
    }
}

/// Default advisory duration for new tests, in minutes.
const DEFAULT_DURATION_MINUTES: u32 = 30;

/// An immutable-once-published test: metadata, ordered questions, and the
/// grading scale.
///
/// Questions and scale are private; publication state is the only thing
/// that changes after construction (see [`TestDefinition::mark_published`]).
#[derive(Debug, Clone)]
pub struct TestDefinition {
    id: Option<String>,
    title: String,
    description: String,
    category: String,
    duration_minutes: u32,
    questions: Vec<Question>,
    grading_scale: GradingScale,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl TestDefinition {
    /// Construct a definition, verifying every question and the grading
    /// scale. A violated invariant rejects the whole value.
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        questions: Vec<Question>,
        grading_scale: GradingScale,
    ) -> Result<Self, MalformedDefinition> {
        let mut ids = HashSet::new();
        for question in &questions {
            question.check()?;
            if !ids.insert(question.id.as_str()) {
                return Err(MalformedDefinition::DuplicateQuestionId {
                    question_id: question.id.clone(),
                });
            }
        }

        Ok(Self {
            id: None,
            title: title.into(),
            description: String::new(),
            category: category.into(),
            duration_minutes: DEFAULT_DURATION_MINUTES,
            questions,
            grading_scale,
            is_active: false,
            created_at: Utc::now(),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Advisory duration shown to the taker; the session never enforces it.
    pub fn with_duration_minutes(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Sum of all question point weights.
    pub fn total_points(&self) -> u32 {
        self.questions.iter().map(|q| q.points).sum()
    }

    pub fn question_at(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Presentation order is insertion order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn grading_scale(&self) -> &GradingScale {
        &self.grading_scale
    }

    /// Record first publication: assign the id (kept on republish) and make
    /// the test visible to takers. The catalog is the only caller.
    pub fn mark_published(&mut self, id: impl Into<String>) {
        if self.id.is_none() {
            self.id = Some(id.into());
        }
        self.is_active = true;
    }

    /// Hide or show a published test without deleting it.
    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_question(id: &str) -> Question {
        Question {
            id: id.into(),
            text: "Pick one".into(),
            kind: QuestionKind::Single,
            options: vec!["a".into(), "b".into()],
            correct_answer: AnswerValue::text("a"),
            points: 5,
            image: None,
        }
    }

    #[test]
    fn kind_display_and_parse() {
        assert_eq!(QuestionKind::Single.to_string(), "single");
        assert_eq!(QuestionKind::Multiple.to_string(), "multiple");
        assert_eq!("input".parse::<QuestionKind>().unwrap(), QuestionKind::Input);
        assert_eq!(
            "Multiple".parse::<QuestionKind>().unwrap(),
            QuestionKind::Multiple
        );
        assert!("essay".parse::<QuestionKind>().is_err());
    }

    #[test]
    fn selection_equality_ignores_order() {
        let a = AnswerValue::selection(["x", "y"]);
        let b = AnswerValue::selection(["y", "x"]);
        assert_eq!(a, b);
    }

    #[test]
    fn blank_answers() {
        assert!(AnswerValue::text("   ").is_blank());
        assert!(AnswerValue::selection(Vec::<String>::new()).is_blank());
        assert!(!AnswerValue::text("4").is_blank());
    }

    #[test]
    fn construction_checks_questions() {
        let mut bad = single_question("q1");
        bad.correct_answer = AnswerValue::text("missing");
        let err = TestDefinition::new("T", "C", vec![bad], GradingScale::default()).unwrap_err();
        assert_eq!(
            err,
            MalformedDefinition::CorrectAnswerNotInOptions {
                question_id: "q1".into()
            }
        );
    }

    #[test]
    fn construction_rejects_duplicate_options() {
        let mut bad = single_question("q1");
        bad.options = vec!["a".into(), "a".into()];
        let err = TestDefinition::new("T", "C", vec![bad], GradingScale::default()).unwrap_err();
        assert!(matches!(err, MalformedDefinition::DuplicateOption { .. }));
    }

    #[test]
    fn construction_rejects_duplicate_question_ids() {
        let err = TestDefinition::new(
            "T",
            "C",
            vec![single_question("q1"), single_question("q1")],
            GradingScale::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MalformedDefinition::DuplicateQuestionId { .. }
        ));
    }

    #[test]
    fn construction_rejects_empty_correct_set() {
        let bad = Question {
            id: "q1".into(),
            text: "Pick all".into(),
            kind: QuestionKind::Multiple,
            options: vec!["a".into(), "b".into()],
            correct_answer: AnswerValue::selection(Vec::<String>::new()),
            points: 3,
            image: None,
        };
        let err = TestDefinition::new("T", "C", vec![bad], GradingScale::default()).unwrap_err();
        assert!(matches!(err, MalformedDefinition::EmptyCorrectSet { .. }));
    }

    #[test]
    fn construction_rejects_shape_mismatch() {
        let bad = Question {
            id: "q1".into(),
            text: "Pick all".into(),
            kind: QuestionKind::Multiple,
            options: vec!["a".into(), "b".into()],
            correct_answer: AnswerValue::text("a"),
            points: 3,
            image: None,
        };
        let err = TestDefinition::new("T", "C", vec![bad], GradingScale::default()).unwrap_err();
        assert!(matches!(err, MalformedDefinition::AnswerShapeMismatch { .. }));
    }

    #[test]
    fn totals_and_accessors() {
        let def = TestDefinition::new(
            "Math",
            "School",
            vec![single_question("q1"), single_question("q2")],
            GradingScale::default(),
        )
        .unwrap()
        .with_duration_minutes(45);

        assert_eq!(def.question_count(), 2);
        assert_eq!(def.total_points(), 10);
        assert_eq!(def.duration_minutes(), 45);
        assert_eq!(def.question_at(1).unwrap().id, "q2");
        assert!(def.question_at(2).is_none());
        assert!(def.id().is_none());
        assert!(!def.is_active());
    }

    #[test]
    fn publication_assigns_id_once() {
        let mut def = TestDefinition::new(
            "Math",
            "School",
            vec![single_question("q1")],
            GradingScale::default(),
        )
        .unwrap();

        def.mark_published("t-1");
        assert_eq!(def.id(), Some("t-1"));
        assert!(def.is_active());

        def.mark_published("t-2");
        assert_eq!(def.id(), Some("t-1"));
    }

    #[test]
    fn view_strips_correct_answer() {
        let question = single_question("q1");
        let view = question.view();
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("correct"));
        assert_eq!(view.options, question.options);
    }

    #[test]
    fn grading_scale_serde_rejects_invalid() {
        let json = r#"[
            {"min_points": 0, "max_points": 50, "grade": "2", "description": ""},
            {"min_points": 60, "max_points": 100, "grade": "5", "description": ""}
        ]"#;
        assert!(serde_json::from_str::<GradingScale>(json).is_err());
    }

    #[test]
    fn question_serde_uses_type_key() {
        let question = single_question("q1");
        let json = serde_json::to_string(&question).unwrap();
        assert!(json.contains(r#""type":"single""#));
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, QuestionKind::Single);
    }
}
