//! Raw-score computation and grade resolution.
//!
//! Scoring is a pure function of a validated definition and a captured
//! answer map. Multi-select questions are all-or-nothing: the captured set
//! must equal the correct set exactly, no partial credit.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{AnswerValue, TestDefinition};

/// The outcome of scoring one completed attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreCard {
    /// Points earned from correctly answered questions.
    pub raw: u32,
    /// Sum of all question weights in the definition.
    pub attainable: u32,
    /// `round(100 * raw / attainable)`, zero when nothing is attainable.
    pub percentage: u8,
    /// Grade label resolved through the definition's scale.
    pub grade: String,
    /// Human-readable description of the resolved band.
    pub grade_description: String,
    /// Per-question breakdown, in presentation order.
    pub per_question: Vec<QuestionMark>,
}

/// How a single question scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionMark {
    pub question_id: String,
    /// Full weight or zero; there is no partial credit.
    pub awarded: u32,
    pub available: u32,
    /// Whether any answer was captured for the question.
    pub answered: bool,
}

/// Score a completed attempt.
///
/// Unanswered questions score zero; they are never an error.
pub fn score(definition: &TestDefinition, answers: &HashMap<String, AnswerValue>) -> ScoreCard {
    let attainable = definition.total_points();
    let mut raw = 0u32;
    let mut per_question = Vec::with_capacity(definition.question_count());

    for question in definition.questions() {
        let captured = answers.get(&question.id);
        let correct =
            captured.is_some_and(|answer| answer_matches(answer, &question.correct_answer));
        let awarded = if correct { question.points } else { 0 };
        raw += awarded;

        per_question.push(QuestionMark {
            question_id: question.id.clone(),
            awarded,
            available: question.points,
            answered: captured.is_some(),
        });
    }

    let percentage = percentage_of(raw, attainable);
    let band = definition.grading_scale().resolve(percentage);

    ScoreCard {
        raw,
        attainable,
        percentage,
        grade: band.grade.clone(),
        grade_description: band.description.clone(),
        per_question,
    }
}

/// Equality rules per modality: trimmed, case-sensitive text comparison for
/// `single`/`input`; exact set equality for `multiple`.
fn answer_matches(captured: &AnswerValue, correct: &AnswerValue) -> bool {
    match (captured, correct) {
        (AnswerValue::Text(a), AnswerValue::Text(b)) => a.trim() == b.trim(),
        (AnswerValue::Selection(a), AnswerValue::Selection(b)) => a == b,
        _ => false,
    }
}

/// Percentage of `attainable` earned, rounded to the nearest integer.
pub fn percentage_of(raw: u32, attainable: u32) -> u8 {
    if attainable == 0 {
        return 0;
    }
    (100.0 * f64::from(raw) / f64::from(attainable)).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GradingCriterion, GradingScale, Question, QuestionKind};

    fn school_scale() -> GradingScale {
        GradingScale::new(vec![
            GradingCriterion::new(85, 100, "5", "Excellent"),
            GradingCriterion::new(70, 84, "4", "Good"),
            GradingCriterion::new(50, 69, "3", "Satisfactory"),
            GradingCriterion::new(0, 49, "2", "Unsatisfactory"),
        ])
        .unwrap()
    }

    fn math_definition() -> TestDefinition {
        TestDefinition::new(
            "Grade 9 Mathematics",
            "Mathematics",
            vec![
                Question {
                    id: "q1".into(),
                    text: "What is (a + b) squared?".into(),
                    kind: QuestionKind::Single,
                    options: vec![
                        "a^2 + b^2".into(),
                        "a^2 + 2ab + b^2".into(),
                        "a^2 - 2ab + b^2".into(),
                        "2a + 2b".into(),
                    ],
                    correct_answer: AnswerValue::text("a^2 + 2ab + b^2"),
                    points: 5,
                    image: None,
                },
                Question {
                    id: "q2".into(),
                    text: "Select every true statement".into(),
                    kind: QuestionKind::Multiple,
                    options: vec![
                        "angles sum to 180".into(),
                        "one right angle".into(),
                        "all sides equal".into(),
                        "median halves area".into(),
                    ],
                    correct_answer: AnswerValue::selection([
                        "angles sum to 180",
                        "one right angle",
                    ]),
                    points: 10,
                    image: None,
                },
                Question {
                    id: "q3".into(),
                    text: "Solve 2x + 5 = 13".into(),
                    kind: QuestionKind::Input,
                    options: vec![],
                    correct_answer: AnswerValue::text("4"),
                    points: 8,
                    image: None,
                },
            ],
            school_scale(),
        )
        .unwrap()
    }

    #[test]
    fn end_to_end_mixed_attempt() {
        // Correct single, half-correct multiple, correct input.
        let definition = math_definition();
        let mut answers = HashMap::new();
        answers.insert("q1".to_string(), AnswerValue::text("a^2 + 2ab + b^2"));
        answers.insert(
            "q2".to_string(),
            AnswerValue::selection(["angles sum to 180"]),
        );
        answers.insert("q3".to_string(), AnswerValue::text("4"));

        let card = score(&definition, &answers);
        assert_eq!(card.raw, 13);
        assert_eq!(card.attainable, 23);
        assert_eq!(card.percentage, 57);
        assert_eq!(card.grade, "3");
        assert_eq!(card.per_question.len(), 3);
        assert_eq!(card.per_question[1].awarded, 0);
        assert!(card.per_question[1].answered);
    }

    #[test]
    fn multiple_exact_set_any_order_scores_full() {
        let definition = math_definition();
        let mut answers = HashMap::new();
        answers.insert(
            "q2".to_string(),
            AnswerValue::selection(["one right angle", "angles sum to 180"]),
        );
        let card = score(&definition, &answers);
        assert_eq!(card.per_question[1].awarded, 10);
    }

    #[test]
    fn multiple_superset_scores_zero() {
        let definition = math_definition();
        let mut answers = HashMap::new();
        answers.insert(
            "q2".to_string(),
            AnswerValue::selection([
                "angles sum to 180",
                "one right angle",
                "all sides equal",
            ]),
        );
        let card = score(&definition, &answers);
        assert_eq!(card.per_question[1].awarded, 0);
    }

    #[test]
    fn input_comparison_trims_whitespace() {
        let definition = math_definition();
        let mut answers = HashMap::new();
        answers.insert("q3".to_string(), AnswerValue::text("  4 "));
        let card = score(&definition, &answers);
        assert_eq!(card.per_question[2].awarded, 8);
    }

    #[test]
    fn input_comparison_is_case_sensitive() {
        let mut definition_answers = HashMap::new();
        let definition = TestDefinition::new(
            "T",
            "C",
            vec![Question {
                id: "q1".into(),
                text: "Name it".into(),
                kind: QuestionKind::Input,
                options: vec![],
                correct_answer: AnswerValue::text("Pythagoras"),
                points: 1,
                image: None,
            }],
            school_scale(),
        )
        .unwrap();
        definition_answers.insert("q1".to_string(), AnswerValue::text("pythagoras"));
        let card = score(&definition, &definition_answers);
        assert_eq!(card.raw, 0);
    }

    #[test]
    fn skipped_question_scores_zero() {
        let definition = math_definition();
        let card = score(&definition, &HashMap::new());
        assert_eq!(card.raw, 0);
        assert_eq!(card.percentage, 0);
        assert_eq!(card.grade, "2");
        assert!(card.per_question.iter().all(|m| !m.answered));
    }

    #[test]
    fn every_percentage_resolves_to_exactly_one_grade() {
        let scale = school_scale();
        for percentage in 0..=100u8 {
            let hits = scale
                .bands()
                .iter()
                .filter(|b| b.contains(percentage))
                .count();
            assert_eq!(hits, 1, "percentage {percentage} hit {hits} bands");
            // resolve() agrees with the unique containing band
            assert!(scale.resolve(percentage).contains(percentage));
        }
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        assert_eq!(percentage_of(13, 23), 57);
        assert_eq!(percentage_of(1, 3), 33);
        assert_eq!(percentage_of(2, 3), 67);
        assert_eq!(percentage_of(0, 0), 0);
        assert_eq!(percentage_of(23, 23), 100);
    }
}
