// Heading outline
use super::Findings;
use crate::page::PageStateProvider;

/// Expects exactly one H1 and no forward jumps of more than one level
pub fn check_headings<P: PageStateProvider + ?Sized>(page: &P) -> Findings {
    let mut findings = Findings::new();
    let headings = page.headings();

    let h1_count = headings.iter().filter(|h| h.level == 1).count();
    if h1_count == 0 {
        findings.warn("The page should contain at least one H1 heading");
    } else if h1_count > 1 {
        findings.warn(format!("The page has {} H1 headings, only one is recommended", h1_count));
    }

    let mut prev_level = 0u8;
    for heading in &headings {
        if prev_level > 0 && heading.level.saturating_sub(prev_level) > 1 {
            findings.warn(format!(
                "Heading levels skip from H{} to H{}",
                prev_level, heading.level
            ));
        }
        prev_level = heading.level;
    }

    findings
}
