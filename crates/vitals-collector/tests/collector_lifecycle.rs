//! End-to-end tests for the collector running on a Tokio runtime

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use vitals_collector::{
    ChannelSource, CollectorError, CollectorHandle, LifecycleSignal, MetricName, MetricSample,
    MetricsSnapshot, NavigationTiming, PerformanceEntry, Rating, UnsupportedSource,
    WebVitalsCollector,
};

type Seen = Arc<Mutex<Vec<MetricsSnapshot>>>;

fn recording_collector(capacity: usize) -> (CollectorHandle, vitals_collector::PerformanceFeed, Seen) {
    let (source, feed) = ChannelSource::new(capacity);
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let handle = WebVitalsCollector::new().with_debug(true).start(
        Arc::new(source),
        Some(Box::new(move |snapshot: &MetricsSnapshot| {
            sink.lock().unwrap().push(snapshot.clone());
        })),
    );
    (handle, feed, seen)
}

async fn wait_until(handle: &CollectorHandle, predicate: impl FnMut(&MetricsSnapshot) -> bool) {
    let mut updates = handle.subscribe();
    tokio::time::timeout(Duration::from_secs(5), updates.wait_for(predicate))
        .await
        .expect("collector did not reach expected state")
        .expect("collector dropped its publisher");
}

#[tokio::test]
async fn test_callback_receives_consistent_snapshots() {
    let (mut handle, feed, seen) = recording_collector(32);
    assert!(handle.is_active());

    feed.send(PerformanceEntry::LargestContentfulPaint { start_time: 1200.0 })
        .await
        .unwrap();
    feed.send(PerformanceEntry::LargestContentfulPaint { start_time: 2000.0 })
        .await
        .unwrap();
    feed.send(PerformanceEntry::LayoutShift {
        value: 0.03,
        had_recent_input: false,
    })
    .await
    .unwrap();
    feed.send(PerformanceEntry::LayoutShift {
        value: 0.02,
        had_recent_input: false,
    })
    .await
    .unwrap();
    feed.send(PerformanceEntry::Paint {
        name: "first-contentful-paint".to_string(),
        start_time: 1500.0,
    })
    .await
    .unwrap();
    feed.send(MetricSample::new(MetricName::Inp, 150.0)).await.unwrap();

    wait_until(&handle, |s| s.inp.is_some()).await;

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.lcp, Some(2000.0));
    assert!((snapshot.cls.unwrap() - 0.05).abs() < 1e-12);
    assert_eq!(snapshot.fcp, Some(1500.0));
    assert_eq!(snapshot.rating, Some(Rating::Good));
    assert_eq!(snapshot.is_good, Some(true));

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 6);
    for observed in &seen {
        assert_eq!(observed.rating, Some(observed.compute_rating()));
    }
    assert_eq!(seen.last(), Some(&snapshot));

    handle.stop();
}

#[tokio::test]
async fn test_user_driven_shifts_are_excluded() {
    let (mut handle, feed, _seen) = recording_collector(8);

    feed.send(PerformanceEntry::LayoutShift {
        value: 0.4,
        had_recent_input: true,
    })
    .await
    .unwrap();
    feed.send(PerformanceEntry::LayoutShift {
        value: 0.01,
        had_recent_input: false,
    })
    .await
    .unwrap();

    wait_until(&handle, |s| s.cls.is_some()).await;
    assert_eq!(handle.snapshot().cls, Some(0.01));
    handle.stop();
}

#[tokio::test]
async fn test_lifecycle_signal_reads_navigation_timing() {
    let (mut handle, feed, _seen) = recording_collector(8);

    feed.set_navigation_timing(NavigationTiming {
        navigation_start: 0.0,
        response_start: 180.0,
        load_event_end: 0.0,
    });
    feed.send(LifecycleSignal::Loaded).await.unwrap();
    wait_until(&handle, |s| s.ttfb.is_some()).await;
    assert_eq!(handle.snapshot().load_time, None);

    feed.set_navigation_timing(NavigationTiming {
        navigation_start: 0.0,
        response_start: 180.0,
        load_event_end: 2400.0,
    });
    feed.send(LifecycleSignal::BeforeUnload).await.unwrap();
    wait_until(&handle, |s| s.load_time.is_some()).await;

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.ttfb, Some(180.0));
    assert_eq!(snapshot.load_time, Some(2400.0));
    handle.stop();
}

#[tokio::test]
async fn test_checkpoint_uses_timing_current_at_send() {
    let (mut handle, feed, _seen) = recording_collector(8);

    feed.set_navigation_timing(NavigationTiming {
        navigation_start: 0.0,
        response_start: 100.0,
        load_event_end: 1000.0,
    });
    feed.send(LifecycleSignal::Loaded).await.unwrap();
    // Lands before the collector task has drained the checkpoint
    feed.set_navigation_timing(NavigationTiming {
        navigation_start: 0.0,
        response_start: 900.0,
        load_event_end: 9000.0,
    });

    wait_until(&handle, |s| s.load_time.is_some()).await;
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.ttfb, Some(100.0));
    assert_eq!(snapshot.load_time, Some(1000.0));
    handle.stop();
}

#[tokio::test]
async fn test_stop_is_idempotent_and_silences_callback() {
    let (mut handle, feed, seen) = recording_collector(8);

    feed.send(MetricSample::new(MetricName::Lcp, 900.0)).await.unwrap();
    wait_until(&handle, |s| s.lcp.is_some()).await;

    handle.stop();
    handle.stop();
    assert!(!handle.is_active());
    assert!(!feed.is_connected());
    assert_eq!(
        feed.send(MetricSample::new(MetricName::Lcp, 3000.0)).await,
        Err(CollectorError::Disconnected)
    );

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(seen.lock().unwrap().len(), 1);
    assert_eq!(handle.snapshot().lcp, Some(900.0));
}

#[tokio::test]
async fn test_dropping_handle_disconnects_feed() {
    let (handle, feed, _seen) = recording_collector(8);
    assert!(feed.is_connected());
    drop(handle);
    assert!(!feed.is_connected());
}

#[tokio::test]
async fn test_unsupported_environment_degrades_to_empty_snapshot() {
    let mut handle = WebVitalsCollector::new().start(Arc::new(UnsupportedSource), None);
    assert!(!handle.is_active());
    assert_eq!(handle.snapshot(), MetricsSnapshot::default());
    handle.stop();
}

#[tokio::test]
async fn test_source_cannot_be_shared_by_two_collectors() {
    let (source, _feed) = ChannelSource::new(8);
    let source = Arc::new(source);
    let collector = WebVitalsCollector::new();

    let first = collector.start(source.clone(), None);
    let second = collector.start(source, None);
    assert!(first.is_active());
    assert!(!second.is_active());
}
