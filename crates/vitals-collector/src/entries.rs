//! Raw performance entries and their translation into metric samples
//!
//! Entries mirror what a browser `PerformanceObserver` hands out for the four
//! observed categories. [`PerformanceEntry::to_sample`] is the one place that
//! decides which entries become samples and how their values are derived.

use serde::{Deserialize, Serialize};
use shared_types::{MetricName, MetricSample};

use crate::environment::EntryType;

/// Paint entry name that carries First Contentful Paint
pub const FIRST_CONTENTFUL_PAINT: &str = "first-contentful-paint";

/// A performance entry delivered by the environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entryType", rename_all = "kebab-case")]
pub enum PerformanceEntry {
    /// A largest-contentful-paint candidate. Later candidates replace earlier ones.
    LargestContentfulPaint {
        #[serde(rename = "startTime")]
        start_time: f64,
    },
    /// The first discrete user input
    FirstInput {
        #[serde(rename = "startTime")]
        start_time: f64,
        #[serde(rename = "processingStart")]
        processing_start: f64,
    },
    /// A single layout shift
    LayoutShift {
        value: f64,
        #[serde(rename = "hadRecentInput", default)]
        had_recent_input: bool,
    },
    /// A paint timing entry (`first-paint`, `first-contentful-paint`, ...)
    Paint {
        name: String,
        #[serde(rename = "startTime")]
        start_time: f64,
    },
}

impl PerformanceEntry {
    pub fn entry_type(&self) -> EntryType {
        match self {
            PerformanceEntry::LargestContentfulPaint { .. } => EntryType::LargestContentfulPaint,
            PerformanceEntry::FirstInput { .. } => EntryType::FirstInput,
            PerformanceEntry::LayoutShift { .. } => EntryType::LayoutShift,
            PerformanceEntry::Paint { .. } => EntryType::Paint,
        }
    }

    /// Translate the entry into a metric sample, if it carries one.
    ///
    /// - LCP is the candidate's start time
    /// - FID is `processingStart - startTime`
    /// - a layout shift becomes a CLS sample that keeps its recent-input flag
    /// - only the `first-contentful-paint` paint becomes FCP
    pub fn to_sample(&self) -> Option<MetricSample> {
        match self {
            PerformanceEntry::LargestContentfulPaint { start_time } => {
                Some(MetricSample::new(MetricName::Lcp, *start_time))
            }
            PerformanceEntry::FirstInput {
                start_time,
                processing_start,
            } => Some(MetricSample::new(
                MetricName::Fid,
                processing_start - start_time,
            )),
            PerformanceEntry::LayoutShift {
                value,
                had_recent_input,
            } => Some(MetricSample::new(MetricName::Cls, *value).with_recent_input(*had_recent_input)),
            PerformanceEntry::Paint { name, start_time } if name == FIRST_CONTENTFUL_PAINT => {
                Some(MetricSample::new(MetricName::Fcp, *start_time))
            }
            PerformanceEntry::Paint { .. } => None,
        }
    }
}
