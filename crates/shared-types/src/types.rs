//! Metric samples, the running metrics snapshot, and its qualitative rating.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// LCP at or below this is good (ms)
pub const LCP_GOOD_MS: f64 = 2500.0;
/// LCP at or below this still earns half credit (ms)
pub const LCP_NEEDS_IMPROVEMENT_MS: f64 = 4000.0;
pub const INP_GOOD_MS: f64 = 200.0;
pub const INP_NEEDS_IMPROVEMENT_MS: f64 = 500.0;
pub const CLS_GOOD: f64 = 0.1;
pub const CLS_NEEDS_IMPROVEMENT: f64 = 0.25;
pub const FCP_GOOD_MS: f64 = 1800.0;
pub const FCP_NEEDS_IMPROVEMENT_MS: f64 = 3000.0;

/// Names of the measurements an environment can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetricName {
    Lcp,
    Fid,
    Inp,
    Cls,
    Fcp,
    Ttfb,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::Lcp => "LCP",
            MetricName::Fid => "FID",
            MetricName::Inp => "INP",
            MetricName::Cls => "CLS",
            MetricName::Fcp => "FCP",
            MetricName::Ttfb => "TTFB",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown metric name: {0}")]
pub struct UnknownMetric(pub String);

impl FromStr for MetricName {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LCP" => Ok(MetricName::Lcp),
            "FID" => Ok(MetricName::Fid),
            "INP" => Ok(MetricName::Inp),
            "CLS" => Ok(MetricName::Cls),
            "FCP" => Ok(MetricName::Fcp),
            "TTFB" => Ok(MetricName::Ttfb),
            _ => Err(UnknownMetric(s.to_string())),
        }
    }
}

/// A single named measurement delivered by the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSample {
    pub name: MetricName,
    /// Milliseconds, except CLS which is a shift magnitude
    pub value: f64,
    /// Only meaningful for CLS: the shift followed recent user input
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub had_recent_input: bool,
    /// Opaque payload forwarded untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<serde_json::Value>,
}

impl MetricSample {
    pub fn new(name: MetricName, value: f64) -> Self {
        Self {
            name,
            value,
            had_recent_input: false,
            attribution: None,
        }
    }

    /// Mark the sample as following recent user input.
    pub fn with_recent_input(mut self, had_recent_input: bool) -> Self {
        self.had_recent_input = had_recent_input;
        self
    }
}

/// Qualitative rating derived from the snapshot's numeric fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    Good,
    NeedsImprovement,
    Poor,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Good => "good",
            Rating::NeedsImprovement => "needs-improvement",
            Rating::Poor => "poor",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation checkpoints in milliseconds on the environment's clock.
///
/// A `load_event_end` of zero means the load event has not completed yet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTiming {
    pub navigation_start: f64,
    pub response_start: f64,
    #[serde(default)]
    pub load_event_end: f64,
}

impl NavigationTiming {
    /// Time to first byte: `responseStart - navigationStart`.
    pub fn ttfb(&self) -> f64 {
        self.response_start - self.navigation_start
    }

    /// Full load time, once the load event has ended.
    pub fn load_time(&self) -> Option<f64> {
        if self.load_event_end > 0.0 && self.load_event_end >= self.navigation_start {
            Some(self.load_event_end - self.navigation_start)
        } else {
            None
        }
    }
}

/// Running aggregate of everything the collector has seen for one page lifetime.
///
/// `rating` and `is_good` are `None` until the first value arrives and are
/// recomputed by [`MetricsSnapshot::refresh_rating`] after every change.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lcp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fid: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cls: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fcp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttfb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_good: Option<bool>,
}

impl MetricsSnapshot {
    /// True when no metric has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.lcp.is_none()
            && self.fid.is_none()
            && self.inp.is_none()
            && self.cls.is_none()
            && self.fcp.is_none()
            && self.ttfb.is_none()
            && self.load_time.is_none()
    }

    /// Raw rating points before averaging (0.0 ..= 3.5).
    pub fn rating_points(&self) -> f64 {
        tiered(self.lcp, LCP_GOOD_MS, LCP_NEEDS_IMPROVEMENT_MS, 1.0)
            + tiered(self.inp, INP_GOOD_MS, INP_NEEDS_IMPROVEMENT_MS, 1.0)
            + tiered(self.cls, CLS_GOOD, CLS_NEEDS_IMPROVEMENT, 1.0)
            + tiered(self.fcp, FCP_GOOD_MS, FCP_NEEDS_IMPROVEMENT_MS, 0.5)
    }

    /// Rate the current LCP/INP/CLS/FCP values. Missing metrics score zero.
    pub fn compute_rating(&self) -> Rating {
        let avg = self.rating_points() / 4.0;
        if avg >= 0.75 {
            Rating::Good
        } else if avg >= 0.5 {
            Rating::NeedsImprovement
        } else {
            Rating::Poor
        }
    }

    /// Bring `rating` and `is_good` in line with the numeric fields.
    pub fn refresh_rating(&mut self) {
        let rating = self.compute_rating();
        self.rating = Some(rating);
        self.is_good = Some(rating == Rating::Good);
    }
}

// full credit at or below `good`, half credit at or below `needs_improvement`
fn tiered(value: Option<f64>, good: f64, needs_improvement: f64, weight: f64) -> f64 {
    match value {
        Some(v) if v <= good => weight,
        Some(v) if v <= needs_improvement => weight / 2.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(lcp: Option<f64>, inp: Option<f64>, cls: Option<f64>, fcp: Option<f64>) -> MetricsSnapshot {
        MetricsSnapshot {
            lcp,
            inp,
            cls,
            fcp,
            ..Default::default()
        }
    }

    #[test]
    fn test_all_good_metrics_rate_good() {
        let s = snapshot(Some(2000.0), Some(150.0), Some(0.05), Some(1500.0));
        assert_eq!(s.rating_points(), 3.5);
        assert_eq!(s.compute_rating(), Rating::Good);
    }

    #[test]
    fn test_all_poor_metrics_rate_poor() {
        let s = snapshot(Some(5000.0), Some(800.0), Some(0.4), None);
        assert_eq!(s.rating_points(), 0.0);
        assert_eq!(s.compute_rating(), Rating::Poor);
    }

    #[test]
    fn test_lcp_boundaries() {
        assert_eq!(snapshot(Some(2500.0), None, None, None).rating_points(), 1.0);
        assert_eq!(snapshot(Some(2501.0), None, None, None).rating_points(), 0.5);
        assert_eq!(snapshot(Some(4000.0), None, None, None).rating_points(), 0.5);
        assert_eq!(snapshot(Some(4001.0), None, None, None).rating_points(), 0.0);
    }

    #[test]
    fn test_inp_boundaries() {
        assert_eq!(snapshot(None, Some(200.0), None, None).rating_points(), 1.0);
        assert_eq!(snapshot(None, Some(201.0), None, None).rating_points(), 0.5);
        assert_eq!(snapshot(None, Some(500.0), None, None).rating_points(), 0.5);
        assert_eq!(snapshot(None, Some(501.0), None, None).rating_points(), 0.0);
    }

    #[test]
    fn test_cls_boundaries() {
        assert_eq!(snapshot(None, None, Some(0.1), None).rating_points(), 1.0);
        assert_eq!(snapshot(None, None, Some(0.11), None).rating_points(), 0.5);
        assert_eq!(snapshot(None, None, Some(0.25), None).rating_points(), 0.5);
        assert_eq!(snapshot(None, None, Some(0.26), None).rating_points(), 0.0);
    }

    #[test]
    fn test_fcp_boundaries() {
        assert_eq!(snapshot(None, None, None, Some(1800.0)).rating_points(), 0.5);
        assert_eq!(snapshot(None, None, None, Some(1801.0)).rating_points(), 0.25);
        assert_eq!(snapshot(None, None, None, Some(3000.0)).rating_points(), 0.25);
        assert_eq!(snapshot(None, None, None, Some(3001.0)).rating_points(), 0.0);
    }

    #[test]
    fn test_needs_improvement_band() {
        // 1 + 0.5 + 0.5 + 0 = 2.0 -> avg 0.5
        let s = snapshot(Some(2000.0), Some(300.0), Some(0.2), None);
        assert_eq!(s.compute_rating(), Rating::NeedsImprovement);
    }

    #[test]
    fn test_three_good_metrics_without_fcp_is_good() {
        // 3.0 / 4 = 0.75
        let s = snapshot(Some(1000.0), Some(100.0), Some(0.0), None);
        assert_eq!(s.compute_rating(), Rating::Good);
    }

    #[test]
    fn test_refresh_rating_sets_is_good() {
        let mut s = snapshot(Some(1000.0), Some(100.0), Some(0.01), Some(1000.0));
        assert_eq!(s.rating, None);
        s.refresh_rating();
        assert_eq!(s.rating, Some(Rating::Good));
        assert_eq!(s.is_good, Some(true));

        s.lcp = Some(9000.0);
        s.inp = Some(900.0);
        s.refresh_rating();
        assert_eq!(s.rating, Some(Rating::Poor));
        assert_eq!(s.is_good, Some(false));
    }

    #[test]
    fn test_empty_snapshot() {
        let s = MetricsSnapshot::default();
        assert!(s.is_empty());
        assert_eq!(s.rating, None);
        assert_eq!(s.is_good, None);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let mut s = MetricsSnapshot {
            load_time: Some(1200.0),
            ..Default::default()
        };
        s.refresh_rating();
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"loadTime\":1200.0"));
        assert!(json.contains("\"isGood\":false"));
        assert!(json.contains("\"rating\":\"poor\""));
        assert!(!json.contains("lcp"));
    }

    #[test]
    fn test_metric_name_parsing() {
        assert_eq!("lcp".parse::<MetricName>().unwrap(), MetricName::Lcp);
        assert_eq!("TTFB".parse::<MetricName>().unwrap(), MetricName::Ttfb);
        assert!("FOO".parse::<MetricName>().is_err());
    }

    #[test]
    fn test_sample_deserializes_from_host_shape() {
        let json = r#"{"name":"CLS","value":0.02,"hadRecentInput":true}"#;
        let sample: MetricSample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.name, MetricName::Cls);
        assert!(sample.had_recent_input);
        assert!(sample.attribution.is_none());
    }

    #[test]
    fn test_navigation_timing() {
        let t = NavigationTiming {
            navigation_start: 1000.0,
            response_start: 1180.0,
            load_event_end: 0.0,
        };
        assert_eq!(t.ttfb(), 180.0);
        assert_eq!(t.load_time(), None);

        let t = NavigationTiming {
            load_event_end: 3400.0,
            ..t
        };
        assert_eq!(t.load_time(), Some(2400.0));
    }
}
