//! The seven page checks
//!
//! Each check is a free function over the page state that returns its own
//! [`Findings`]. The auditor merges them in a fixed order, so two audits of
//! the same page always list findings identically.

pub mod accessibility;
pub mod headings;
pub mod images;
pub mod links;
pub mod metadata;
pub mod performance;
pub mod structured_data;

use shared_types::AuditIssue;

/// Scored issues, score-affecting warnings and free recommendations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Findings {
    pub issues: Vec<AuditIssue>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, issue: AuditIssue) {
        self.issues.push(issue);
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn recommend(&mut self, recommendation: impl Into<String>) {
        self.recommendations.push(recommendation.into());
    }

    /// Append `other`, keeping order
    pub fn merge(&mut self, other: Findings) {
        self.issues.extend(other.issues);
        self.warnings.extend(other.warnings);
        self.recommendations.extend(other.recommendations);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty() && self.warnings.is_empty() && self.recommendations.is_empty()
    }
}
