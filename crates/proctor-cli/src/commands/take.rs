//! The `proctor take` command.
//!
//! Replays an answers file through a real session: every answer goes
//! through capture/advance, so the same gating a live taker faces applies
//! to the replay.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use serde::Deserialize;

use proctor_core::model::AnswerValue;
use proctor_report::AttemptReport;
use proctor_session::session::{Advance, CompletedAttempt, Session};
use proctor_session::sink::LoggingSink;

#[derive(Debug, Deserialize)]
struct AnswersFile {
    answers: HashMap<String, TomlAnswer>,
}

/// `q1 = "x"` for single/input, `q2 = ["x", "y"]` for multiple.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TomlAnswer {
    One(String),
    Many(Vec<String>),
}

impl From<TomlAnswer> for AnswerValue {
    fn from(answer: TomlAnswer) -> Self {
        match answer {
            TomlAnswer::One(value) => AnswerValue::Text(value),
            TomlAnswer::Many(values) => AnswerValue::selection(values),
        }
    }
}

pub async fn execute(
    test_path: PathBuf,
    answers_path: PathBuf,
    output: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let definition = Arc::new(proctor_core::parser::parse_definition(&test_path)?);

    let content = std::fs::read_to_string(&answers_path)
        .with_context(|| format!("failed to read answers file: {}", answers_path.display()))?;
    let parsed: AnswersFile = toml::from_str(&content)
        .with_context(|| format!("failed to parse TOML: {}", answers_path.display()))?;
    let mut answers: HashMap<String, AnswerValue> = parsed
        .answers
        .into_iter()
        .map(|(id, answer)| (id, answer.into()))
        .collect();

    let mut session = Session::start(Arc::clone(&definition))?
        .with_sink(Arc::new(LoggingSink));

    let attempt = loop {
        let view = match session.current_question() {
            Some(view) => view,
            None => anyhow::bail!("session completed without an outcome"),
        };

        let answer = answers
            .remove(&view.id)
            .with_context(|| format!("no answer for question '{}'", view.id))?;
        session
            .capture_answer(answer)
            .with_context(|| format!("answer for question '{}' rejected", view.id))?;
        anyhow::ensure!(
            session.can_proceed(),
            "answer for question '{}' is blank",
            view.id
        );

        match session.advance()? {
            Advance::Continued { .. } => {}
            Advance::Completed(attempt) => break attempt,
        }
    };

    let report = AttemptReport::new(&definition, &attempt);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            print_summary(&report, &attempt);
        }
    }

    if let Some(path) = output {
        report.save_json(&path)?;
        println!("Report saved to {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &AttemptReport, attempt: &CompletedAttempt) {
    println!(
        "Test: {} ({})",
        report.test.title, report.test.category
    );
    println!(
        "Score: {}/{} ({}%)",
        attempt.score.raw, attempt.score.attainable, attempt.score.percentage
    );
    println!(
        "Grade: {} ({})",
        attempt.score.grade, attempt.score.grade_description
    );

    let mut table = Table::new();
    table.set_header(vec!["Question", "Points", "Awarded", "Answered"]);

    for mark in &attempt.score.per_question {
        table.add_row(vec![
            Cell::new(&mark.question_id),
            Cell::new(mark.available),
            Cell::new(mark.awarded),
            Cell::new(if mark.answered { "yes" } else { "no" }),
        ]);
    }

    println!("\n{table}");
}
