//! Replay of recorded performance traces
//!
//! A trace is newline-delimited JSON. Each line is either a collector event
//! (`{"kind":"entry",...}`, `{"kind":"sample",...}`, `{"kind":"lifecycle",...}`)
//! or a navigation timing record (`{"navigation":{...}}`). Each lifecycle
//! checkpoint is stamped with the latest timing record before it, so later
//! records never rewrite an earlier checkpoint. Blank lines are ignored and
//! malformed lines are logged and skipped.

use serde::Deserialize;
use shared_types::NavigationTiming;
use tracing::{debug, warn};
use vitals_collector::{PerformanceEvent, PerformanceFeed};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TraceLine {
    Navigation { navigation: NavigationTiming },
    Event(PerformanceEvent),
}

/// Counts from one replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub events: usize,
    pub timings: usize,
    pub skipped: usize,
}

/// Push every trace line through `feed`, in order
pub async fn replay_trace(feed: &PerformanceFeed, trace: &str) -> anyhow::Result<ReplayStats> {
    let mut stats = ReplayStats::default();

    for (index, line) in trace.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<TraceLine>(line) {
            Ok(TraceLine::Navigation { navigation }) => {
                feed.set_navigation_timing(navigation);
                stats.timings += 1;
            }
            Ok(TraceLine::Event(event)) => {
                feed.send(event).await?;
                stats.events += 1;
            }
            Err(e) => {
                warn!(line = index + 1, error = %e, "Skipping malformed trace line");
                stats.skipped += 1;
            }
        }
    }

    debug!(?stats, "Trace replayed");
    Ok(stats)
}
