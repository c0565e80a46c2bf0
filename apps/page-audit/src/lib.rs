//! Page audit driver
//!
//! Replays a recorded performance trace into a running Web Vitals collector,
//! waits for the initial audit delay, then audits a captured page state
//! against whatever metrics the collector has gathered.

pub mod config;
pub mod trace;

use std::sync::Arc;

use audit_engine::{run_initial_audit, PageAuditor, StaticPage};
use shared_types::{AuditResult, MetricsSnapshot};
use tracing::info;
use vitals_collector::{ChannelSource, WebVitalsCollector};

pub use config::AuditConfig;
pub use trace::{replay_trace, ReplayStats};

/// Everything produced by one audit run
#[derive(Debug, Clone)]
pub struct AuditRun {
    pub result: AuditResult,
    /// Collector snapshot at the time the collector was stopped
    pub snapshot: MetricsSnapshot,
    pub replay: ReplayStats,
}

impl AuditRun {
    /// True when a score floor is set and the score is below it
    pub fn below(&self, fail_under: Option<u32>) -> bool {
        fail_under.is_some_and(|floor| self.result.score < floor)
    }
}

/// Run collector and auditor together over one page
pub async fn run_audit(
    page: &StaticPage,
    trace: Option<&str>,
    config: &AuditConfig,
) -> anyhow::Result<AuditRun> {
    let (source, feed) = ChannelSource::new(config.collector.channel_capacity);
    let mut handle = WebVitalsCollector::new()
        .with_debug(config.collector.debug)
        .start(Arc::new(source), None);

    let replay = match trace {
        Some(trace) => replay_trace(&feed, trace).await?,
        None => ReplayStats::default(),
    };
    info!(
        events = replay.events,
        skipped = replay.skipped,
        "Replayed performance trace"
    );

    let auditor = PageAuditor::new(config.site.domain.as_str());
    let result = run_initial_audit(&auditor, page, || handle.snapshot()).await;

    let snapshot = handle.snapshot();
    handle.stop();

    Ok(AuditRun {
        result,
        snapshot,
        replay,
    })
}
