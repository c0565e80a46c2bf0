// Anchor text and external link safety
use super::Findings;
use crate::page::{Link, PageStateProvider};

/// `rel` tokens that keep an external page from reaching `window.opener`
pub const SAFE_REL_TOKENS: &[&str] = &["noopener", "noreferrer"];

/// Flags undescribed links (aggregated) and unsafe external links (one each)
pub fn check_links<P: PageStateProvider + ?Sized>(page: &P, site_domain: &str) -> Findings {
    let mut findings = Findings::new();
    let mut undescribed = 0usize;

    for link in page.links() {
        if !link.is_described() {
            undescribed += 1;
        }
        if is_external(&link, site_domain) && !has_safe_rel(&link) {
            findings.warn(format!(
                "External link {} is missing rel=\"noopener noreferrer\"",
                link.href.as_deref().unwrap_or_default()
            ));
        }
    }

    if undescribed > 0 {
        findings.warn(format!("{} links have no text, title or aria-label", undescribed));
    }

    findings
}

fn is_external(link: &Link, site_domain: &str) -> bool {
    match link.href.as_deref().and_then(http_host) {
        Some(host) => !host_matches(host, site_domain),
        None => false,
    }
}

fn has_safe_rel(link: &Link) -> bool {
    link.rel.as_deref().is_some_and(|rel| {
        rel.split_whitespace()
            .any(|token| SAFE_REL_TOKENS.iter().any(|safe| token.eq_ignore_ascii_case(safe)))
    })
}

/// Host of an absolute `http`/`https` URL, without userinfo or port
pub fn http_host(href: &str) -> Option<&str> {
    let (scheme, rest) = href.trim_start().split_once("://")?;
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return None;
    }

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit('@').next().unwrap_or_default();
    let host = match host_port.rfind(':') {
        Some(idx) if !host_port.ends_with(']') => &host_port[..idx],
        _ => host_port,
    };
    (!host.is_empty()).then_some(host)
}

/// True when `host` is `domain` or one of its subdomains
pub fn host_matches(host: &str, domain: &str) -> bool {
    let host = host.trim_end_matches('.');
    let domain = domain.trim_end_matches('.');
    if domain.is_empty() {
        return false;
    }
    let (h, d) = (host.as_bytes(), domain.as_bytes());
    if h.eq_ignore_ascii_case(d) {
        return true;
    }
    let split = match h.len().checked_sub(d.len() + 1) {
        Some(split) => split,
        None => return false,
    };
    h[split] == b'.' && h[split + 1..].eq_ignore_ascii_case(d)
}
