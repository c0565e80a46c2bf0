//! Audit result reporting
//!
//! # Output Formats
//!
//! - **JSON**: machine-readable, compact or pretty
//! - **Console**: grouped human-readable summary
//! - **Markdown**: for pull request comments and stored reports
//!
//! # Example
//!
//! ```no_run
//! use audit_engine::reporter::{OutputFormat, Reporter};
//! use shared_types::AuditResult;
//!
//! # fn example(result: AuditResult) -> anyhow::Result<()> {
//! Reporter::new(OutputFormat::Console).report(&result)?;
//! Reporter::new(OutputFormat::Json).write_to_file(&result, "audit.json")?;
//! # Ok(())
//! # }
//! ```

mod console;
mod json;
mod markdown;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use shared_types::AuditResult;

pub use console::ConsoleReporter;
pub use json::JsonReporter;
pub use markdown::MarkdownReporter;

/// Output format for audit results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Json,
    JsonPretty,
    #[default]
    Console,
    Markdown,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::JsonPretty => "json-pretty",
            OutputFormat::Console => "console",
            OutputFormat::Markdown => "markdown",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "json-pretty" => Ok(OutputFormat::JsonPretty),
            "console" | "text" => Ok(OutputFormat::Console),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => bail!(
                "Unknown output format: {} (expected console, json, json-pretty or markdown)",
                other
            ),
        }
    }
}

/// Reporter for audit results
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Print the formatted result to stdout
    pub fn report(&self, result: &AuditResult) -> Result<()> {
        let output = self.format_result(result)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(output.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, result: &AuditResult, path: P) -> Result<()> {
        let output = self.format_result(result)?;
        fs::write(path, output)?;
        Ok(())
    }

    pub fn format_result(&self, result: &AuditResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => JsonReporter::format(result, false),
            OutputFormat::JsonPretty => JsonReporter::format(result, true),
            OutputFormat::Console => ConsoleReporter::format(result),
            OutputFormat::Markdown => MarkdownReporter::format(result),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use shared_types::{AuditIssue, AuditResult, MetricsSnapshot};

    pub fn sample_result() -> AuditResult {
        let mut metrics = MetricsSnapshot {
            lcp: Some(2100.0),
            inp: Some(120.0),
            cls: Some(0.02),
            fcp: Some(900.0),
            load_time: Some(3250.0),
            ..Default::default()
        };
        metrics.refresh_rating();

        AuditResult {
            timestamp: 1_700_000_000_000,
            score: 73,
            issues: vec![AuditIssue::warning(
                "2 images missing alt text",
                "Every image should carry descriptive alt text",
                3,
            )],
            warnings: vec![
                "Add a canonical link to avoid duplicate content".to_string(),
                "Add og:image so social shares get a preview image".to_string(),
                "Add a Twitter Card tag to improve shares on Twitter".to_string(),
                "Missing meta keywords (still used by some search engines)".to_string(),
            ],
            recommendations: vec!["Verify text readability".to_string()],
            metrics,
        }
    }
}
