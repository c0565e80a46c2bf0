//! Console reporter for audit results

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::fmt::Write;

use shared_types::{AuditResult, MetricsSnapshot};

use crate::score::ScoreGrade;

/// Console format reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn format(result: &AuditResult) -> Result<String> {
        let mut output = String::new();
        let grade = ScoreGrade::from_score(result.score);

        writeln!(output)?;
        writeln!(output, "╔══════════════════════════════════════════════════════════════╗")?;
        writeln!(output, "║                      PAGE AUDIT REPORT                        ║")?;
        writeln!(output, "╚══════════════════════════════════════════════════════════════╝")?;
        writeln!(output)?;
        writeln!(output, "Score:     {}/100 {} {}", result.score, grade.symbol(), grade.as_str().to_uppercase())?;
        writeln!(output, "Generated: {}", format_timestamp(result.timestamp))?;
        writeln!(output)?;

        if !result.issues.is_empty() {
            writeln!(output, "Issues ({}):", result.issues.len())?;
            for issue in &result.issues {
                writeln!(
                    output,
                    "  ✗ [{} {}] {}",
                    issue.issue_type().as_str(),
                    issue.severity(),
                    issue.title()
                )?;
                if !issue.description().is_empty() {
                    writeln!(output, "      {}", issue.description())?;
                }
            }
            writeln!(output)?;
        }

        if !result.warnings.is_empty() {
            writeln!(output, "Warnings ({}):", result.warnings.len())?;
            for warning in &result.warnings {
                writeln!(output, "  ⚠ {}", warning)?;
            }
            writeln!(output)?;
        }

        if !result.recommendations.is_empty() {
            writeln!(output, "Recommendations ({}):", result.recommendations.len())?;
            for recommendation in &result.recommendations {
                writeln!(output, "  • {}", recommendation)?;
            }
            writeln!(output)?;
        }

        Self::format_metrics(&mut output, &result.metrics)?;
        Ok(output)
    }

    fn format_metrics(output: &mut String, metrics: &MetricsSnapshot) -> Result<()> {
        writeln!(output, "Metrics:")?;
        if metrics.is_empty() {
            writeln!(output, "  (none collected)")?;
            return Ok(());
        }
        if let Some(fcp) = metrics.fcp {
            writeln!(output, "  FCP:        {:.2}ms", fcp)?;
        }
        if let Some(lcp) = metrics.lcp {
            writeln!(output, "  LCP:        {:.2}ms", lcp)?;
        }
        if let Some(inp) = metrics.inp {
            writeln!(output, "  INP:        {:.2}ms", inp)?;
        }
        if let Some(cls) = metrics.cls {
            writeln!(output, "  CLS:        {:.3}", cls)?;
        }
        if let Some(load_time) = metrics.load_time {
            writeln!(output, "  Load Time:  {:.2}s", load_time / 1000.0)?;
        }
        if let Some(rating) = metrics.rating {
            writeln!(output, "  Rating:     {}", rating)?;
        }
        Ok(())
    }
}

pub(crate) fn format_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| millis.to_string())
}
