//! Data model shared by the metrics collector and the page auditor.
//!
//! - `types`: metric samples, the running snapshot and its rating
//! - `audit`: audit issues and the scored audit result

pub mod audit;
pub mod types;

pub use audit::{AuditIssue, AuditResult, InvalidSeverity, IssueType};
pub use types::{MetricName, MetricSample, MetricsSnapshot, NavigationTiming, Rating, UnknownMetric};
