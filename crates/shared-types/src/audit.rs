//! Page audit findings and the scored report built from them

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::MetricsSnapshot;

/// Kind of audit issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Error,
    Warning,
    Info,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Error => "error",
            IssueType::Warning => "warning",
            IssueType::Info => "info",
        }
    }
}

/// A single scored finding. Severity runs from 1 (cosmetic) to 5 (critical).
///
/// Fields are read-only once built; deserialization rejects severities
/// outside 1..=5.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IssueRecord")]
pub struct AuditIssue {
    #[serde(rename = "type")]
    issue_type: IssueType,
    title: String,
    description: String,
    severity: u8,
}

pub const MIN_SEVERITY: u8 = 1;
pub const MAX_SEVERITY: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("issue severity {0} outside 1..=5")]
pub struct InvalidSeverity(pub u8);

#[derive(Deserialize)]
struct IssueRecord {
    #[serde(rename = "type")]
    issue_type: IssueType,
    title: String,
    description: String,
    severity: u8,
}

impl TryFrom<IssueRecord> for AuditIssue {
    type Error = InvalidSeverity;

    fn try_from(record: IssueRecord) -> Result<Self, Self::Error> {
        if !(MIN_SEVERITY..=MAX_SEVERITY).contains(&record.severity) {
            return Err(InvalidSeverity(record.severity));
        }
        Ok(Self {
            issue_type: record.issue_type,
            title: record.title,
            description: record.description,
            severity: record.severity,
        })
    }
}

impl AuditIssue {
    /// Create an issue, clamping severity into 1..=5
    pub fn new(
        issue_type: IssueType,
        title: impl Into<String>,
        description: impl Into<String>,
        severity: u8,
    ) -> Self {
        Self {
            issue_type,
            title: title.into(),
            description: description.into(),
            severity: severity.clamp(MIN_SEVERITY, MAX_SEVERITY),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>, severity: u8) -> Self {
        Self::new(IssueType::Error, title, description, severity)
    }

    pub fn warning(
        title: impl Into<String>,
        description: impl Into<String>,
        severity: u8,
    ) -> Self {
        Self::new(IssueType::Warning, title, description, severity)
    }

    pub fn issue_type(&self) -> IssueType {
        self.issue_type
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn severity(&self) -> u8 {
        self.severity
    }
}

/// Point-in-time audit report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// 0..=100
    pub score: u32,
    pub issues: Vec<AuditIssue>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    pub metrics: MetricsSnapshot,
}

impl AuditResult {
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.issue_type() == IssueType::Error)
            .count()
    }

    /// Total penalty carried by issues (severity x 5 each)
    pub fn issue_penalty(&self) -> u32 {
        self.issues.iter().map(|i| u32::from(i.severity()) * 5).sum()
    }

    /// Compare everything but the timestamp
    pub fn same_findings(&self, other: &AuditResult) -> bool {
        self.score == other.score
            && self.issues == other.issues
            && self.warnings == other.warnings
            && self.recommendations == other.recommendations
    }
}
