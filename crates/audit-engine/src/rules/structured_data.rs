// JSON-LD structured data
use serde_json::Value;
use shared_types::AuditIssue;
use tracing::debug;

use super::Findings;
use crate::page::PageStateProvider;

/// Schema types that describe the page as an application
pub const APPLICATION_TYPES: &[&str] = &["WebApplication", "SoftwareApplication"];

pub const FAQ_TYPE: &str = "FAQPage";

/// Parses each structured-data block and looks for application and FAQ schemas
pub fn check_structured_data<P: PageStateProvider + ?Sized>(page: &P) -> Findings {
    let mut findings = Findings::new();
    let blocks = page.structured_data();

    if blocks.is_empty() {
        findings.warn("Add JSON-LD structured data to help search engines understand the page");
        return findings;
    }

    let mut has_application = false;
    let mut has_faq = false;

    for (index, block) in blocks.iter().enumerate() {
        let body = if block.trim().is_empty() { "{}" } else { block.as_str() };
        match serde_json::from_str::<Value>(body) {
            Ok(data) => {
                let types = schema_types(&data);
                has_application |= types.iter().any(|t| APPLICATION_TYPES.contains(t));
                has_faq |= types.contains(&FAQ_TYPE);
            }
            Err(e) => {
                debug!(index, error = %e, "Structured data block is not valid JSON");
                findings.issue(AuditIssue::error(
                    "Malformed structured data",
                    "A JSON-LD script contains invalid JSON",
                    3,
                ));
            }
        }
    }

    if !has_application {
        findings.warn("Add a WebApplication schema describing the application");
    }
    if !has_faq {
        findings.recommend("If the page answers common questions, an FAQPage schema can improve search results");
    }

    findings
}

/// Collect every `@type` declared by a JSON-LD document.
///
/// Handles top-level arrays, `@graph` members and `@type` given as an array.
pub fn schema_types(value: &Value) -> Vec<&str> {
    let mut types = Vec::new();
    collect_types(value, &mut types);
    types
}

fn collect_types<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| collect_types(item, out)),
        Value::Object(map) => {
            match map.get("@type") {
                Some(Value::String(t)) => out.push(t.as_str()),
                Some(Value::Array(ts)) => out.extend(ts.iter().filter_map(Value::as_str)),
                _ => {}
            }
            if let Some(graph) = map.get("@graph") {
                collect_types(graph, out);
            }
        }
        _ => {}
    }
}
