//! Draft editing and publish-gate validation for the authoring surface.
//!
//! The editing flow is forgiving: drafts may pass through invalid
//! intermediate states (blank options, a removed last option), and
//! validation happens when the operator commits the draft or publishes the
//! test, not on every keystroke.

use std::collections::HashSet;

use crate::error::{IncompletePublication, InvalidGradingScale, InvalidQuestion};
use crate::model::{AnswerValue, GradingCriterion, Question, QuestionKind, TestDefinition};

/// An in-progress question being edited by the operator.
#[derive(Debug, Clone)]
pub struct QuestionDraft {
    pub text: String,
    pub kind: QuestionKind,
    pub options: Vec<String>,
    pub correct_answer: Option<AnswerValue>,
    pub points: u32,
    pub image: Option<String>,
}

impl Default for QuestionDraft {
    /// The editor's seed state: a single-choice question with one blank
    /// option, worth one point.
    fn default() -> Self {
        Self {
            text: String::new(),
            kind: QuestionKind::Single,
            options: vec![String::new()],
            correct_answer: None,
            points: 1,
            image: None,
        }
    }
}

impl QuestionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch the answer modality. Moving to `input` drops the option list;
    /// moving away from it seeds one blank option, as the editor does.
    pub fn set_kind(&mut self, kind: QuestionKind) {
        if self.kind == kind {
            return;
        }
        self.kind = kind;
        self.correct_answer = None;
        self.options = if kind.has_options() {
            vec![String::new()]
        } else {
            Vec::new()
        };
    }

    /// Append an option, preserving order.
    pub fn add_option(&mut self, option: impl Into<String>) {
        self.options.push(option.into());
    }

    /// Replace the option at `index`. Out-of-range edits are ignored,
    /// matching the editor's tolerant behavior.
    pub fn update_option_at(&mut self, index: usize, option: impl Into<String>) {
        if let Some(slot) = self.options.get_mut(index) {
            *slot = option.into();
        }
    }

    /// Remove the option at `index`. Removing the last option of a choice
    /// draft is legal here; [`validate_question_draft`] rejects it at
    /// commit time.
    pub fn remove_option_at(&mut self, index: usize) {
        if index < self.options.len() {
            self.options.remove(index);
        }
    }

    /// Options that survive trimming: the ones a committed question keeps.
    pub fn surviving_options(&self) -> Vec<&str> {
        self.options
            .iter()
            .map(String::as_str)
            .filter(|o| !o.trim().is_empty())
            .collect()
    }

    /// Validate and turn the draft into an immutable [`Question`], dropping
    /// blank options.
    pub fn commit(self, id: impl Into<String>) -> Result<Question, InvalidQuestion> {
        validate_question_draft(&self)?;

        let correct_answer = self
            .correct_answer
            .ok_or(InvalidQuestion::MissingCorrectAnswer)?;

        let options: Vec<String> = self
            .options
            .into_iter()
            .filter(|o| !o.trim().is_empty())
            .collect();

        Ok(Question {
            id: id.into(),
            text: self.text,
            kind: self.kind,
            options,
            correct_answer,
            points: self.points,
            image: self.image,
        })
    }
}

/// Check a question draft, reporting the first violated constraint.
pub fn validate_question_draft(draft: &QuestionDraft) -> Result<(), InvalidQuestion> {
    if draft.text.trim().is_empty() {
        return Err(InvalidQuestion::EmptyText);
    }

    if draft.kind.has_options() {
        let surviving = draft.surviving_options();
        if surviving.is_empty() {
            return Err(InvalidQuestion::NoOptions);
        }

        let mut seen = HashSet::new();
        for option in &surviving {
            if !seen.insert(*option) {
                return Err(InvalidQuestion::DuplicateOption(option.to_string()));
            }
        }

        // Edit flows may have removed the option a correct answer pointed at.
        match &draft.correct_answer {
            Some(AnswerValue::Text(value)) => {
                if matches!(draft.kind, QuestionKind::Multiple) {
                    return Err(InvalidQuestion::WrongAnswerShape);
                }
                if !surviving.contains(&value.as_str()) {
                    return Err(InvalidQuestion::DanglingCorrectAnswer);
                }
            }
            Some(AnswerValue::Selection(values)) => {
                if !matches!(draft.kind, QuestionKind::Multiple) {
                    return Err(InvalidQuestion::WrongAnswerShape);
                }
                if values.is_empty() {
                    return Err(InvalidQuestion::NoCorrectSelection);
                }
                if !values.iter().all(|v| surviving.contains(&v.as_str())) {
                    return Err(InvalidQuestion::DanglingCorrectAnswer);
                }
            }
            None => {}
        }
    } else if let Some(answer) = &draft.correct_answer {
        if !answer.matches_kind(draft.kind) {
            return Err(InvalidQuestion::WrongAnswerShape);
        }
    }

    if draft.points == 0 {
        return Err(InvalidQuestion::ZeroPoints);
    }

    Ok(())
}

/// The single gate before a definition becomes visible to test-takers.
pub fn validate_for_publish(definition: &TestDefinition) -> Result<(), IncompletePublication> {
    if definition.title().trim().is_empty() {
        return Err(IncompletePublication::MissingTitle);
    }
    if definition.category().trim().is_empty() {
        return Err(IncompletePublication::MissingCategory);
    }
    if definition.question_count() == 0 {
        return Err(IncompletePublication::NoQuestions);
    }
    Ok(())
}

/// Check that `bands` partition `[0, 100]`: pairwise non-overlapping, no
/// gaps. Reports the first offending percentage.
pub fn validate_grading_scale(bands: &[GradingCriterion]) -> Result<(), InvalidGradingScale> {
    for (index, band) in bands.iter().enumerate() {
        if band.min_points > band.max_points {
            return Err(InvalidGradingScale::InvertedBand { index });
        }
        if band.max_points > 100 {
            return Err(InvalidGradingScale::OutOfRange { index });
        }
    }

    // The domain is 101 integers; checking each directly is exact and
    // keeps gap/overlap reporting trivial.
    for percentage in 0..=100u8 {
        match bands.iter().filter(|b| b.contains(percentage)).count() {
            0 => return Err(InvalidGradingScale::Gap { at: percentage }),
            1 => {}
            _ => return Err(InvalidGradingScale::Overlap { at: percentage }),
        }
    }

    Ok(())
}
