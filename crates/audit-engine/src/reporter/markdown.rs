//! Markdown reporter for audit results

use anyhow::Result;
use std::fmt::Write;

use shared_types::AuditResult;

use super::console::format_timestamp;
use crate::score::ScoreGrade;

/// Markdown format reporter
pub struct MarkdownReporter;

impl MarkdownReporter {
    pub fn format(result: &AuditResult) -> Result<String> {
        let mut output = String::new();
        let grade = ScoreGrade::from_score(result.score);

        writeln!(output, "# Page Audit Report")?;
        writeln!(output)?;
        writeln!(output, "**Score:** {}/100 ({})  ", result.score, grade.as_str())?;
        writeln!(output, "**Generated:** {}", format_timestamp(result.timestamp))?;
        writeln!(output)?;

        if !result.issues.is_empty() {
            writeln!(output, "## Issues")?;
            writeln!(output)?;
            writeln!(output, "| Type | Severity | Title | Description |")?;
            writeln!(output, "|------|----------|-------|-------------|")?;
            for issue in &result.issues {
                writeln!(
                    output,
                    "| {} | {} | {} | {} |",
                    issue.issue_type().as_str(),
                    issue.severity(),
                    escape(issue.title()),
                    escape(issue.description())
                )?;
            }
            writeln!(output)?;
        }

        if !result.warnings.is_empty() {
            writeln!(output, "## Warnings")?;
            writeln!(output)?;
            for warning in &result.warnings {
                writeln!(output, "- {}", warning)?;
            }
            writeln!(output)?;
        }

        if !result.recommendations.is_empty() {
            writeln!(output, "## Recommendations")?;
            writeln!(output)?;
            for recommendation in &result.recommendations {
                writeln!(output, "- {}", recommendation)?;
            }
            writeln!(output)?;
        }

        let m = &result.metrics;
        if !m.is_empty() {
            writeln!(output, "## Metrics")?;
            writeln!(output)?;
            writeln!(output, "| Metric | Value |")?;
            writeln!(output, "|--------|-------|")?;
            let rows = [
                ("FCP", m.fcp.map(|v| format!("{:.2}ms", v))),
                ("LCP", m.lcp.map(|v| format!("{:.2}ms", v))),
                ("INP", m.inp.map(|v| format!("{:.2}ms", v))),
                ("CLS", m.cls.map(|v| format!("{:.3}", v))),
                ("TTFB", m.ttfb.map(|v| format!("{:.2}ms", v))),
                ("Load Time", m.load_time.map(|v| format!("{:.2}s", v / 1000.0))),
            ];
            for (name, value) in rows {
                if let Some(value) = value {
                    writeln!(output, "| {} | {} |", name, value)?;
                }
            }
            if let Some(rating) = m.rating {
                writeln!(output)?;
                writeln!(output, "Overall rating: **{}**", rating)?;
            }
        }

        Ok(output)
    }
}

fn escape(cell: &str) -> String {
    cell.replace('|', "\\|")
}
