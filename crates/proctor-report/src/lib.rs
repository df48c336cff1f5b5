//! proctor-report — Attempt report types with JSON persistence and
//! markdown rendering for the results display.

pub mod markdown;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use proctor_core::model::TestDefinition;
use proctor_core::scoring::ScoreCard;
use proctor_session::session::CompletedAttempt;

/// A complete record of one finished attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the attempted test.
    pub test: TestSummary,
    /// The scored outcome.
    pub score: ScoreCard,
    /// Total seconds the attempt took.
    pub total_seconds: u64,
}

/// Summary of a test definition (without questions or answers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSummary {
    pub title: String,
    pub category: String,
    pub question_count: usize,
    pub duration_minutes: u32,
}

impl AttemptReport {
    pub fn new(definition: &TestDefinition, attempt: &CompletedAttempt) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            test: TestSummary {
                title: definition.title().to_string(),
                category: definition.category().to_string(),
                question_count: definition.question_count(),
                duration_minutes: definition.duration_minutes(),
            },
            score: attempt.score.clone(),
            total_seconds: attempt.total_seconds,
        }
    }

    /// Save the report as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AttemptReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    pub fn to_markdown(&self) -> String {
        markdown::render(self)
    }
}

/// Render elapsed seconds as `MM:SS`, the way the taker-facing timer does.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
