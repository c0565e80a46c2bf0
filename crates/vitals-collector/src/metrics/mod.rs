//! Metric aggregation and the collection loop

pub mod aggregator;
pub mod web_vitals;

pub use aggregator::MetricsAggregator;
pub use web_vitals::{CollectorHandle, UpdateCallback, WebVitalsCollector};
