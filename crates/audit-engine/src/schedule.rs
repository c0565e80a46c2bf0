//! Delayed first audit and audit logging

use std::time::Duration;

use shared_types::{AuditResult, MetricsSnapshot};
use tracing::{info, warn};

use crate::page::PageStateProvider;
use crate::score::{ScoreGrade, FAIR_SCORE};
use crate::PageAuditor;

/// Pause before the first audit so more metric samples can arrive.
///
/// Best effort only: the audit may still see a partially populated snapshot.
pub const INITIAL_AUDIT_DELAY: Duration = Duration::from_millis(1000);

/// Wait [`INITIAL_AUDIT_DELAY`], read the current metrics, audit and log
///
/// `read_metrics` is called after the delay, so it observes whatever the
/// collector has gathered by then.
pub async fn run_initial_audit<P, F>(auditor: &PageAuditor, page: &P, read_metrics: F) -> AuditResult
where
    P: PageStateProvider + ?Sized,
    F: FnOnce() -> MetricsSnapshot,
{
    tokio::time::sleep(INITIAL_AUDIT_DELAY).await;
    let result = auditor.audit(page, read_metrics());
    log_audit_result(&result);
    result
}

/// Log the audit summary at info, plus a warning for low scores
pub fn log_audit_result(result: &AuditResult) {
    let grade = ScoreGrade::from_score(result.score);
    info!(
        score = result.score,
        grade = grade.as_str(),
        issues = result.issues.len(),
        warnings = result.warnings.len(),
        recommendations = result.recommendations.len(),
        "Page audit: {}/100",
        result.score
    );
    if result.score < FAIR_SCORE {
        warn!(
            score = result.score,
            errors = result.error_count(),
            "Page audit score below {}",
            FAIR_SCORE
        );
    }
}
