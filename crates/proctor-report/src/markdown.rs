//! Markdown rendering of attempt reports.

use crate::{format_clock, AttemptReport};

/// Render the report as markdown: a summary block and a per-question
/// breakdown table.
pub fn render(report: &AttemptReport) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {} — attempt report\n\n", report.test.title));
    md.push_str(&format!("**Category:** {}\n", report.test.category));
    md.push_str(&format!(
        "**Completed:** {}\n",
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!(
        "**Time taken:** {} (advisory limit {} min)\n",
        format_clock(report.total_seconds),
        report.test.duration_minutes
    ));
    md.push_str(&format!(
        "**Score:** {}/{} ({}%) — grade {} ({})\n\n",
        report.score.raw,
        report.score.attainable,
        report.score.percentage,
        report.score.grade,
        report.score.grade_description
    ));

    md.push_str("| Question | Points | Awarded | Answered |\n");
    md.push_str("|----------|--------|---------|----------|\n");
    for mark in &report.score.per_question {
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            mark.question_id,
            mark.available,
            mark.awarded,
            if mark.answered { "yes" } else { "no" }
        ));
    }

    md
}
