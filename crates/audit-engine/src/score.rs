//! Audit scoring
//!
//! `score = clamp(100 - sum(severity * 5) - 3 * warnings, 0, 100)`.
//! Recommendations never affect the score.

use serde::{Deserialize, Serialize};
use shared_types::AuditIssue;

pub const MAX_SCORE: u32 = 100;
pub const SEVERITY_WEIGHT: i64 = 5;
pub const WARNING_PENALTY: i64 = 3;

/// Score below which an audit is logged as a warning
pub const FAIR_SCORE: u32 = 60;
pub const GOOD_SCORE: u32 = 80;

pub fn calculate_score(issues: &[AuditIssue], warning_count: usize) -> u32 {
    let issue_penalty: i64 = issues
        .iter()
        .map(|issue| i64::from(issue.severity()) * SEVERITY_WEIGHT)
        .sum();
    let warning_penalty = i64::try_from(warning_count)
        .unwrap_or(i64::MAX)
        .saturating_mul(WARNING_PENALTY);

    let raw = i64::from(MAX_SCORE)
        .saturating_sub(issue_penalty)
        .saturating_sub(warning_penalty);
    // clamped into 0..=100, so the cast is lossless
    raw.clamp(0, i64::from(MAX_SCORE)) as u32
}

/// Qualitative band of a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreGrade {
    Good,
    Fair,
    Poor,
}

impl ScoreGrade {
    pub fn from_score(score: u32) -> Self {
        if score >= GOOD_SCORE {
            ScoreGrade::Good
        } else if score >= FAIR_SCORE {
            ScoreGrade::Fair
        } else {
            ScoreGrade::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreGrade::Good => "good",
            ScoreGrade::Fair => "fair",
            ScoreGrade::Poor => "poor",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ScoreGrade::Good => "✓",
            ScoreGrade::Fair => "⚠",
            ScoreGrade::Poor => "✗",
        }
    }
}
