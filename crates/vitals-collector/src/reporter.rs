//! Plain-text rendering of a metrics snapshot

use anyhow::Result;
use std::fmt::Write;

use shared_types::{MetricsSnapshot, Rating};

/// Format a snapshot as a short human-readable report
///
/// Missing values print as `N/A`; the banner reads `UNKNOWN` until at least
/// one rated metric has arrived.
pub fn format_snapshot_report(snapshot: &MetricsSnapshot) -> Result<String> {
    let mut output = String::new();

    let (symbol, label) = match snapshot.rating {
        Some(rating @ Rating::Good) => ("✓", rating.as_str().to_uppercase()),
        Some(rating @ Rating::NeedsImprovement) => ("⚠", rating.as_str().to_uppercase()),
        Some(rating @ Rating::Poor) => ("✗", rating.as_str().to_uppercase()),
        None => ("?", "UNKNOWN".to_string()),
    };

    writeln!(output, "Web Vitals Report")?;
    writeln!(output, "─────────────────────────────────────")?;
    writeln!(output, "Overall: {} {}", symbol, label)?;
    writeln!(output)?;

    writeln!(output, "Core Web Vitals:")?;
    writeln!(output, "  LCP:  {}", millis(snapshot.lcp))?;
    writeln!(output, "  INP:  {}", millis(snapshot.inp))?;
    writeln!(output, "  CLS:  {}", shift(snapshot.cls))?;
    writeln!(output)?;

    writeln!(output, "Other Metrics:")?;
    writeln!(output, "  FCP:        {}", millis(snapshot.fcp))?;
    writeln!(output, "  TTFB:       {}", millis(snapshot.ttfb))?;
    writeln!(output, "  Load Time:  {}", seconds(snapshot.load_time))?;

    Ok(output)
}

fn millis(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{}ms", v.round()))
}

fn shift(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.3}", v))
}

fn seconds(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.2}s", v / 1000.0))
}
