//! TOML test definition loader.
//!
//! The core contract is in-memory; this module is the fixture/CLI layer
//! that reads definitions from `.toml` files and directories. Structural
//! invariants are still enforced by [`TestDefinition::new`] — the loader
//! only maps the file shape onto the model.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{
    AnswerValue, GradingCriterion, GradingScale, Question, QuestionKind, TestDefinition,
};

/// Intermediate TOML structure for definition files.
#[derive(Debug, Deserialize)]
struct TomlTestFile {
    test: TomlTestHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
    #[serde(default)]
    grading: Vec<TomlBand>,
}

#[derive(Debug, Deserialize)]
struct TomlTestHeader {
    title: String,
    #[serde(default)]
    description: String,
    category: String,
    #[serde(default = "default_duration")]
    duration_minutes: u32,
}

fn default_duration() -> u32 {
    30
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    text: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    options: Vec<String>,
    correct: TomlCorrect,
    #[serde(default = "default_points")]
    points: u32,
    #[serde(default)]
    image: Option<String>,
}

fn default_points() -> u32 {
    1
}

/// `correct = "x"` for single/input, `correct = ["x", "y"]` for multiple.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TomlCorrect {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct TomlBand {
    min: u8,
    max: u8,
    grade: String,
    #[serde(default)]
    description: String,
}

/// Parse a single TOML file into a validated `TestDefinition`.
pub fn parse_definition(path: &Path) -> Result<TestDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read test definition: {}", path.display()))?;

    parse_definition_str(&content, path)
}

/// Parse a TOML string into a `TestDefinition` (useful for testing).
pub fn parse_definition_str(content: &str, source_path: &Path) -> Result<TestDefinition> {
    let parsed: TomlTestFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let kind: QuestionKind = q
                .kind
                .parse()
                .map_err(|e: String| anyhow::anyhow!("question '{}': {e}", q.id))?;

            let correct_answer = match q.correct {
                TomlCorrect::One(value) => AnswerValue::Text(value),
                TomlCorrect::Many(values) => AnswerValue::selection(values),
            };

            Ok(Question {
                id: q.id,
                text: q.text,
                kind,
                options: q.options,
                correct_answer,
                points: q.points,
                image: q.image,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let grading_scale = if parsed.grading.is_empty() {
        GradingScale::default()
    } else {
        let bands = parsed
            .grading
            .into_iter()
            .map(|b| GradingCriterion::new(b.min, b.max, b.grade, b.description))
            .collect();
        GradingScale::new(bands)
            .with_context(|| format!("invalid grading scale in {}", source_path.display()))?
    };

    let definition = TestDefinition::new(
        parsed.test.title,
        parsed.test.category,
        questions,
        grading_scale,
    )
    .with_context(|| format!("malformed test definition in {}", source_path.display()))?
    .with_description(parsed.test.description)
    .with_duration_minutes(parsed.test.duration_minutes);

    Ok(definition)
}

/// Recursively load all `.toml` definition files from a directory.
/// Files that fail to parse are logged and skipped.
pub fn load_definition_directory(dir: &Path) -> Result<Vec<TestDefinition>> {
    let mut definitions = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            definitions.extend(load_definition_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_definition(&path) {
                Ok(definition) => definitions.push(definition),
                Err(e) => {
                    tracing::warn!("skipping {}: {e:#}", path.display());
                }
            }
        }
    }

    Ok(definitions)
}

/// A non-fatal finding about a loaded definition.
#[derive(Debug, Clone)]
pub struct DefinitionWarning {
    pub message: String,
}

/// Flag cosmetic issues a valid definition may still have.
pub fn definition_warnings(definition: &TestDefinition) -> Vec<DefinitionWarning> {
    let mut warnings = Vec::new();

    if definition.description().trim().is_empty() {
        warnings.push(DefinitionWarning {
            message: "description is empty".into(),
        });
    }

    if definition.duration_minutes() == 0 {
        warnings.push(DefinitionWarning {
            message: "advisory duration is zero minutes".into(),
        });
    }

    warnings
}
