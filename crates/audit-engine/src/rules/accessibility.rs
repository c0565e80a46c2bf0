// Accessible names for interactive controls
use super::Findings;
use crate::page::PageStateProvider;

pub const CONTRAST_REMINDER: &str =
    "Verify text readability with a WCAG color contrast checker";

/// Counts unlabeled controls as a recommendation and appends the contrast reminder
pub fn check_accessibility<P: PageStateProvider + ?Sized>(page: &P) -> Findings {
    let mut findings = Findings::new();

    let unlabeled = page
        .interactive_elements()
        .iter()
        .filter(|el| !el.has_accessible_name())
        .count();
    if unlabeled > 0 {
        findings.recommend(format!(
            "{} interactive elements lack a label, adding one improves accessibility",
            unlabeled
        ));
    }

    findings.recommend(CONTRAST_REMINDER);
    findings
}
