// Load time and oversized resources
use shared_types::MetricsSnapshot;

use super::Findings;
use crate::page::{PageStateProvider, ResourceTiming};

pub const SLOW_LOAD_MS: f64 = 3000.0;

/// Resources transferring more than this many bytes are flagged
pub const LARGE_RESOURCE_BYTES: u64 = 500 * 1024;

/// Best known load time for the page.
///
/// Prefers the collector's value, then the page's own load checkpoint, and
/// finally the time elapsed since navigation start while still loading.
pub fn resolve_load_time<P: PageStateProvider + ?Sized>(
    page: &P,
    metrics: &MetricsSnapshot,
) -> Option<f64> {
    metrics
        .load_time
        .or_else(|| page.navigation_timing().and_then(|t| t.load_time()))
        .or_else(|| page.time_since_navigation_start())
}

/// Recommends work on slow loads and oversized resources
pub fn check_performance(load_time: Option<f64>, resources: &[ResourceTiming]) -> Findings {
    let mut findings = Findings::new();

    if let Some(load_time) = load_time.filter(|ms| *ms > SLOW_LOAD_MS) {
        findings.recommend(format!(
            "Page load took {:.2}s, consider optimizing resource loading",
            load_time / 1000.0
        ));
    }

    let large = resources
        .iter()
        .filter(|r| r.transfer_size > LARGE_RESOURCE_BYTES)
        .count();
    if large > 0 {
        findings.recommend(format!(
            "{} resources are larger than 500KB, consider optimizing or splitting them",
            large
        ));
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::StaticPage;
    use shared_types::NavigationTiming;

    fn resource(size: u64) -> ResourceTiming {
        ResourceTiming {
            name: format!("asset-{}.js", size),
            transfer_size: size,
        }
    }

    #[test]
    fn test_slow_load_recommendation() {
        let findings = check_performance(Some(4250.0), &[]);
        assert_eq!(
            findings.recommendations,
            vec!["Page load took 4.25s, consider optimizing resource loading"]
        );
        assert!(check_performance(Some(3000.0), &[]).is_empty());
        assert!(check_performance(None, &[]).is_empty());
    }

    #[test]
    fn test_large_resources_are_aggregated() {
        let findings = check_performance(
            None,
            &[resource(512_000), resource(512_001), resource(2_000_000), resource(0)],
        );
        assert_eq!(findings.recommendations.len(), 1);
        assert!(findings.recommendations[0].starts_with("2 resources"));
    }

    #[test]
    fn test_load_time_resolution_order() {
        let mut page = StaticPage {
            navigation_timing: Some(NavigationTiming {
                navigation_start: 0.0,
                response_start: 100.0,
                load_event_end: 0.0,
            }),
            captured_at: Some(1800.0),
            ..Default::default()
        };
        let mut metrics = MetricsSnapshot::default();
        assert_eq!(resolve_load_time(&page, &metrics), Some(1800.0));

        page.navigation_timing = Some(NavigationTiming {
            navigation_start: 0.0,
            response_start: 100.0,
            load_event_end: 2500.0,
        });
        assert_eq!(resolve_load_time(&page, &metrics), Some(2500.0));

        metrics.load_time = Some(2100.0);
        assert_eq!(resolve_load_time(&page, &metrics), Some(2100.0));
    }
}
