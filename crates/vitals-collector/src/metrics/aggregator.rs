//! Update policy that folds samples into a [`MetricsSnapshot`]
//!
//! | metric | rule |
//! |--------|------|
//! | LCP, FID, INP, TTFB | last write wins |
//! | CLS | summed, skipping shifts that followed recent input |
//! | FCP | first value wins |
//!
//! TTFB and load time are also derived from navigation timing at lifecycle
//! checkpoints. The rating is refreshed after every change, so the snapshot
//! never pairs new numbers with an old rating.

use shared_types::{MetricName, MetricSample, MetricsSnapshot, NavigationTiming};
use tracing::warn;

/// Single-owner aggregate of metric samples
#[derive(Debug, Clone, Default)]
pub struct MetricsAggregator {
    snapshot: MetricsSnapshot,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &MetricsSnapshot {
        &self.snapshot
    }

    /// Apply a sample. Returns true when the snapshot changed.
    pub fn apply_sample(&mut self, sample: &MetricSample) -> bool {
        if !sample.value.is_finite() {
            warn!(metric = %sample.name, value = sample.value, "Ignoring non-finite metric value");
            return false;
        }

        let s = &mut self.snapshot;
        let changed = match sample.name {
            MetricName::Lcp => overwrite(&mut s.lcp, sample.value),
            MetricName::Fid => overwrite(&mut s.fid, sample.value),
            MetricName::Inp => overwrite(&mut s.inp, sample.value),
            MetricName::Ttfb => overwrite(&mut s.ttfb, sample.value),
            MetricName::Cls => {
                if sample.had_recent_input {
                    false
                } else {
                    let total = s.cls.unwrap_or(0.0) + sample.value;
                    overwrite(&mut s.cls, total)
                }
            }
            MetricName::Fcp => {
                if s.fcp.is_some() {
                    false
                } else {
                    s.fcp = Some(sample.value);
                    true
                }
            }
        };

        if changed {
            self.snapshot.refresh_rating();
        }
        changed
    }

    /// Derive TTFB and load time from navigation timing.
    ///
    /// Load time is left untouched until the load event has ended.
    pub fn apply_navigation(&mut self, timing: &NavigationTiming) -> bool {
        let ttfb = timing.ttfb();
        if !ttfb.is_finite() {
            warn!(ttfb, "Ignoring non-finite navigation timing");
            return false;
        }

        let s = &mut self.snapshot;
        let mut changed = overwrite(&mut s.ttfb, ttfb);
        if let Some(load_time) = timing.load_time() {
            changed |= overwrite(&mut s.load_time, load_time);
        }

        if changed {
            self.snapshot.refresh_rating();
        }
        changed
    }
}

fn overwrite(slot: &mut Option<f64>, value: f64) -> bool {
    if *slot == Some(value) {
        return false;
    }
    *slot = Some(value);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Rating;

    fn cls(value: f64, had_recent_input: bool) -> MetricSample {
        MetricSample::new(MetricName::Cls, value).with_recent_input(had_recent_input)
    }

    #[test]
    fn test_lcp_last_write_wins() {
        let mut agg = MetricsAggregator::new();
        assert!(agg.apply_sample(&MetricSample::new(MetricName::Lcp, 1200.0)));
        assert!(agg.apply_sample(&MetricSample::new(MetricName::Lcp, 1800.0)));
        assert_eq!(agg.snapshot().lcp, Some(1800.0));
    }

    #[test]
    fn test_repeated_value_is_not_a_change() {
        let mut agg = MetricsAggregator::new();
        assert!(agg.apply_sample(&MetricSample::new(MetricName::Inp, 90.0)));
        assert!(!agg.apply_sample(&MetricSample::new(MetricName::Inp, 90.0)));
    }

    #[test]
    fn test_cls_accumulates() {
        let mut agg = MetricsAggregator::new();
        agg.apply_sample(&cls(0.05, false));
        agg.apply_sample(&cls(0.02, false));
        let total = agg.snapshot().cls.unwrap();
        assert!((total - 0.07).abs() < 1e-12);
    }

    #[test]
    fn test_cls_skips_user_driven_shifts() {
        let mut agg = MetricsAggregator::new();
        assert!(!agg.apply_sample(&cls(0.3, true)));
        assert_eq!(agg.snapshot().cls, None);
        assert_eq!(agg.snapshot().rating, None);

        agg.apply_sample(&cls(0.01, false));
        assert!(!agg.apply_sample(&cls(0.5, true)));
        assert_eq!(agg.snapshot().cls, Some(0.01));
    }

    #[test]
    fn test_fcp_is_set_once() {
        let mut agg = MetricsAggregator::new();
        assert!(agg.apply_sample(&MetricSample::new(MetricName::Fcp, 700.0)));
        assert!(!agg.apply_sample(&MetricSample::new(MetricName::Fcp, 950.0)));
        assert_eq!(agg.snapshot().fcp, Some(700.0));
    }

    #[test]
    fn test_rating_tracks_every_change() {
        let mut agg = MetricsAggregator::new();
        agg.apply_sample(&MetricSample::new(MetricName::Lcp, 2000.0));
        agg.apply_sample(&MetricSample::new(MetricName::Inp, 150.0));
        agg.apply_sample(&cls(0.05, false));
        agg.apply_sample(&MetricSample::new(MetricName::Fcp, 1500.0));
        assert_eq!(agg.snapshot().rating, Some(Rating::Good));
        assert_eq!(agg.snapshot().is_good, Some(true));

        agg.apply_sample(&MetricSample::new(MetricName::Lcp, 5000.0));
        agg.apply_sample(&MetricSample::new(MetricName::Inp, 800.0));
        assert_eq!(agg.snapshot().rating, Some(Rating::Poor));
        assert_eq!(agg.snapshot().is_good, Some(false));
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let mut agg = MetricsAggregator::new();
        assert!(!agg.apply_sample(&MetricSample::new(MetricName::Lcp, f64::NAN)));
        assert!(!agg.apply_sample(&cls(f64::INFINITY, false)));
        assert!(agg.snapshot().is_empty());
    }

    #[test]
    fn test_navigation_before_load_sets_only_ttfb() {
        let mut agg = MetricsAggregator::new();
        let timing = NavigationTiming {
            navigation_start: 100.0,
            response_start: 340.0,
            load_event_end: 0.0,
        };
        assert!(agg.apply_navigation(&timing));
        assert_eq!(agg.snapshot().ttfb, Some(240.0));
        assert_eq!(agg.snapshot().load_time, None);

        let loaded = NavigationTiming {
            load_event_end: 2100.0,
            ..timing
        };
        assert!(agg.apply_navigation(&loaded));
        assert_eq!(agg.snapshot().load_time, Some(2000.0));
        assert!(!agg.apply_navigation(&loaded));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn shift() -> impl Strategy<Value = (f64, bool)> {
        ((0u32..1000).prop_map(|v| v as f64 / 1000.0), any::<bool>())
    }

    proptest! {
        /// Property: CLS equals the sum of shifts not following recent input, in any order
        #[test]
        fn cls_is_order_independent_sum(
            shifts in prop::collection::vec(shift(), 0..40),
            seed in any::<u64>(),
        ) {
            let expected: f64 = shifts.iter().filter(|(_, recent)| !recent).map(|(v, _)| v).sum();

            let mut shuffled = shifts.clone();
            // deterministic rotation standing in for arbitrary delivery order
            if !shuffled.is_empty() {
                let k = (seed % shuffled.len() as u64) as usize;
                shuffled.rotate_left(k);
                shuffled.reverse();
            }

            for order in [&shifts, &shuffled] {
                let mut agg = MetricsAggregator::new();
                for (value, recent) in order.iter() {
                    agg.apply_sample(&MetricSample::new(MetricName::Cls, *value).with_recent_input(*recent));
                }
                let total = agg.snapshot().cls.unwrap_or(0.0);
                prop_assert!((total - expected).abs() < 1e-9);
            }
        }

        /// Property: the snapshot rating always matches its numeric fields
        #[test]
        fn rating_never_stale(values in prop::collection::vec((0usize..6, 0.0f64..6000.0), 1..30)) {
            let names = [
                MetricName::Lcp,
                MetricName::Fid,
                MetricName::Inp,
                MetricName::Cls,
                MetricName::Fcp,
                MetricName::Ttfb,
            ];
            let mut agg = MetricsAggregator::new();
            for (idx, value) in values {
                agg.apply_sample(&MetricSample::new(names[idx], value));
                let s = agg.snapshot();
                if !s.is_empty() {
                    prop_assert_eq!(s.rating, Some(s.compute_rating()));
                }
            }
        }
    }
}
