// Image alternative text
use shared_types::AuditIssue;

use super::Findings;
use crate::page::PageStateProvider;

/// Reports images without descriptive alt text as one aggregate issue
pub fn check_images<P: PageStateProvider + ?Sized>(page: &P) -> Findings {
    let mut findings = Findings::new();

    let missing = page.images().iter().filter(|img| !img.has_alt_text()).count();
    if missing > 0 {
        findings.issue(AuditIssue::warning(
            format!("{} images missing alt text", missing),
            "Every image should carry descriptive alt text for accessibility and search",
            3,
        ));
    }

    findings
}
