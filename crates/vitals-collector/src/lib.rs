//! Client-side Core Web Vitals collection
//!
//! This crate turns a stream of performance events (paint timings, layout
//! shifts, input delays, navigation timing) into a continuously updated
//! [`MetricsSnapshot`] with a composite [`Rating`].
//!
//! # Features
//!
//! - **Pluggable environment**: anything implementing [`PerformanceSource`] can feed the collector
//! - **Single consumer**: one task owns aggregation, so snapshots are never torn
//! - **Observers**: an update callback plus a `tokio::sync::watch` subscription
//! - **Graceful degradation**: unsupported environments produce an empty snapshot
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vitals_collector::{ChannelSource, LifecycleSignal, PerformanceEntry, WebVitalsCollector};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let (source, feed) = ChannelSource::new(128);
//! let mut handle = WebVitalsCollector::new().start(Arc::new(source), None);
//!
//! feed.send(PerformanceEntry::LargestContentfulPaint { start_time: 1800.0 }).await?;
//! feed.send(LifecycleSignal::Loaded).await?;
//!
//! println!("{}", vitals_collector::format_snapshot_report(&handle.snapshot())?);
//! handle.stop();
//! # Ok(())
//! # }
//! ```

pub mod entries;
pub mod environment;
pub mod error;
pub mod metrics;
pub mod reporter;

pub use entries::PerformanceEntry;
pub use environment::{
    ChannelSource, EntryType, LifecycleSignal, PerformanceEvent, PerformanceFeed,
    PerformanceSource, UnsupportedSource,
};
pub use error::CollectorError;
pub use metrics::{CollectorHandle, MetricsAggregator, UpdateCallback, WebVitalsCollector};
pub use reporter::format_snapshot_report;

pub use shared_types::{MetricName, MetricSample, MetricsSnapshot, NavigationTiming, Rating};
