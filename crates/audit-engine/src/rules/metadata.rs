// Title, description, social preview and language metadata
use shared_types::AuditIssue;

use super::Findings;
use crate::page::PageStateProvider;

pub const TITLE_MIN_CHARS: usize = 30;
pub const TITLE_MAX_CHARS: usize = 60;
pub const DESCRIPTION_MIN_CHARS: usize = 120;
pub const DESCRIPTION_MAX_CHARS: usize = 160;

/// Checks head metadata that search engines and link previews rely on
pub fn check_metadata<P: PageStateProvider + ?Sized>(page: &P) -> Findings {
    let mut findings = Findings::new();

    match page.title().filter(|t| !t.is_empty()) {
        None => findings.issue(AuditIssue::error(
            "Missing page title",
            "Every page needs a unique, descriptive <title> element",
            5,
        )),
        Some(title) => {
            let len = title.chars().count();
            if len < TITLE_MIN_CHARS {
                findings.warn(format!(
                    "Page title is too short ({} characters, recommended {}-{})",
                    len, TITLE_MIN_CHARS, TITLE_MAX_CHARS
                ));
            } else if len > TITLE_MAX_CHARS {
                findings.warn(format!(
                    "Page title is too long ({} characters, recommended {}-{})",
                    len, TITLE_MIN_CHARS, TITLE_MAX_CHARS
                ));
            }
        }
    }

    match page.meta("description").filter(|d| !d.is_empty()) {
        None => findings.issue(AuditIssue::error(
            "Missing meta description",
            "The page needs a clear meta description of 120-160 characters",
            5,
        )),
        Some(description) => {
            let len = description.chars().count();
            if len < DESCRIPTION_MIN_CHARS {
                findings.warn(format!(
                    "Meta description is too short ({} characters, recommended {}-{})",
                    len, DESCRIPTION_MIN_CHARS, DESCRIPTION_MAX_CHARS
                ));
            } else if len > DESCRIPTION_MAX_CHARS {
                findings.warn(format!(
                    "Meta description is too long ({} characters, recommended {}-{})",
                    len, DESCRIPTION_MIN_CHARS, DESCRIPTION_MAX_CHARS
                ));
            }
        }
    }

    if page.meta("keywords").map_or(true, |k| k.is_empty()) {
        findings.warn("Missing meta keywords (still used by some search engines)");
    }

    if page.meta("viewport").is_none() {
        findings.issue(AuditIssue::error(
            "Missing viewport meta tag",
            "A viewport meta tag is required for responsive rendering on mobile devices",
            5,
        ));
    }

    if !page.has_link_rel("canonical") {
        findings.warn("Add a canonical link to avoid duplicate content");
    }

    if page.meta("og:title").is_none() || page.meta("og:description").is_none() {
        findings.warn("Complete the Open Graph title and description for social sharing");
    }
    if page.meta("og:image").is_none() {
        findings.warn("Add og:image so social shares get a preview image");
    }

    if page.meta("twitter:card").is_none() {
        findings.warn("Add a Twitter Card tag to improve shares on Twitter");
    }

    if page.language().map_or(true, |lang| lang.is_empty()) {
        findings.issue(AuditIssue::warning(
            "Missing html lang attribute",
            "The root <html> element should declare its language, e.g. lang=\"en\"",
            3,
        ));
    }

    findings
}
