//! Rule-based page audit
//!
//! [`PageAuditor`] runs seven independent checks over a page (metadata,
//! structured data, images, headings, links, accessibility, performance)
//! and scores the outcome. Audits are synchronous, fail-soft and carry no
//! state between calls.
//!
//! # Example
//!
//! ```no_run
//! use audit_engine::{PageAuditor, StaticPage};
//! use shared_types::MetricsSnapshot;
//!
//! # fn example() -> anyhow::Result<()> {
//! let page = StaticPage::from_json_file("page.json")?;
//! let result = PageAuditor::new("example.com").audit(&page, MetricsSnapshot::default());
//! println!("score: {}", result.score);
//! # Ok(())
//! # }
//! ```

pub mod page;
pub mod reporter;
pub mod rules;
pub mod schedule;
pub mod score;

use shared_types::{AuditResult, MetricsSnapshot};
use tracing::instrument;

pub use page::{PageStateProvider, StaticPage};
pub use reporter::{OutputFormat, Reporter};
pub use rules::Findings;
pub use schedule::{log_audit_result, run_initial_audit, INITIAL_AUDIT_DELAY};
pub use score::{calculate_score, ScoreGrade};

/// Stateless page auditor
#[derive(Debug, Clone)]
pub struct PageAuditor {
    site_domain: String,
}

impl PageAuditor {
    /// `site_domain` decides which links count as external
    pub fn new(site_domain: impl Into<String>) -> Self {
        Self {
            site_domain: site_domain.into(),
        }
    }

    pub fn site_domain(&self) -> &str {
        &self.site_domain
    }

    /// Audit `page` against the given metrics snapshot
    ///
    /// The snapshot is copied into the result with the best known load time
    /// filled in.
    #[instrument(skip_all, fields(site = %self.site_domain))]
    pub fn audit<P: PageStateProvider + ?Sized>(&self, page: &P, metrics: MetricsSnapshot) -> AuditResult {
        let mut findings = Findings::new();

        findings.merge(rules::metadata::check_metadata(page));
        findings.merge(rules::structured_data::check_structured_data(page));
        findings.merge(rules::images::check_images(page));
        findings.merge(rules::headings::check_headings(page));
        findings.merge(rules::links::check_links(page, &self.site_domain));
        findings.merge(rules::accessibility::check_accessibility(page));

        let mut metrics = metrics;
        metrics.load_time = rules::performance::resolve_load_time(page, &metrics);
        findings.merge(rules::performance::check_performance(
            metrics.load_time,
            &page.resource_timings(),
        ));

        let score = calculate_score(&findings.issues, findings.warnings.len());

        AuditResult {
            timestamp: chrono::Utc::now().timestamp_millis(),
            score,
            issues: findings.issues,
            warnings: findings.warnings,
            recommendations: findings.recommendations,
            metrics,
        }
    }
}
