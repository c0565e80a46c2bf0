//! Core Web Vitals collection from a performance source
//!
//! This module provides the [`WebVitalsCollector`] which subscribes to a
//! [`PerformanceSource`], folds every delivered event into a running
//! [`MetricsSnapshot`] and hands the full snapshot to an optional callback
//! after each change.
//!
//! # How it works
//!
//! 1. `start` subscribes to the observed entry categories on the source
//! 2. A single task drains the event queue, translating entries into samples
//! 3. Samples go through [`MetricsAggregator`], which also refreshes the rating
//! 4. On change, the snapshot is passed to the callback and then published on a watch channel
//!
//! If the source cannot observe performance, or no Tokio runtime is running,
//! the collector degrades to a no-op handle that reports an empty snapshot.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vitals_collector::{ChannelSource, MetricsSnapshot, WebVitalsCollector};
//!
//! # async fn example() {
//! let (source, feed) = ChannelSource::new(64);
//! let mut handle = WebVitalsCollector::new()
//!     .with_debug(true)
//!     .start(Arc::new(source), Some(Box::new(|snapshot: &MetricsSnapshot| {
//!         println!("rating: {:?}", snapshot.rating);
//!     })));
//!
//! // ... the environment pushes events through `feed` ...
//! # drop(feed);
//!
//! let snapshot = handle.snapshot();
//! handle.stop();
//! # }
//! ```

use std::sync::{Arc, Mutex};

use shared_types::MetricsSnapshot;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::environment::{lock, PerformanceEvent, PerformanceSource, OBSERVED_ENTRY_TYPES};
use crate::metrics::aggregator::MetricsAggregator;

/// Observer invoked with the full snapshot after every change
pub type UpdateCallback = Box<dyn FnMut(&MetricsSnapshot) + Send + 'static>;

/// Web Vitals collector
///
/// Holds only configuration; each call to [`start`](Self::start) creates an
/// independent collection with its own snapshot.
#[derive(Debug, Clone, Default)]
pub struct WebVitalsCollector {
    debug: bool,
}

struct CollectorState {
    aggregator: MetricsAggregator,
    callback: Option<UpdateCallback>,
    stopped: bool,
}

/// Handle to a running collection
///
/// Dropping the handle stops the collection.
pub struct CollectorHandle {
    state: Arc<Mutex<CollectorState>>,
    updates: watch::Receiver<MetricsSnapshot>,
    source: Option<Arc<dyn PerformanceSource>>,
    task: Option<JoinHandle<()>>,
}

impl WebVitalsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a trace line for every snapshot change
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Start collecting from `source`
    ///
    /// Never fails. When the source refuses to subscribe, or this is called
    /// outside a Tokio runtime, the returned handle is inactive and its
    /// snapshot stays empty.
    pub fn start(
        &self,
        source: Arc<dyn PerformanceSource>,
        on_update: Option<UpdateCallback>,
    ) -> CollectorHandle {
        let state = Arc::new(Mutex::new(CollectorState {
            aggregator: MetricsAggregator::new(),
            callback: on_update,
            stopped: false,
        }));
        let (publisher, updates) = watch::channel(MetricsSnapshot::default());

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!(error = %e, "No async runtime available, metrics collection disabled");
                return CollectorHandle::inactive(state, updates);
            }
        };

        let events = match source.subscribe(&OBSERVED_ENTRY_TYPES) {
            Ok(events) => events,
            Err(e) => {
                warn!(error = %e, "Performance observation unavailable, metrics collection disabled");
                return CollectorHandle::inactive(state, updates);
            }
        };

        debug!("Starting metrics collection");
        let task = runtime.spawn(run_collection(
            events,
            source.clone(),
            state.clone(),
            publisher,
            self.debug,
        ));

        CollectorHandle {
            state,
            updates,
            source: Some(source),
            task: Some(task),
        }
    }
}

async fn run_collection(
    mut events: mpsc::Receiver<PerformanceEvent>,
    source: Arc<dyn PerformanceSource>,
    state: Arc<Mutex<CollectorState>>,
    publisher: watch::Sender<MetricsSnapshot>,
    debug_mode: bool,
) {
    while let Some(event) = events.recv().await {
        // Timing stamped on the checkpoint wins; the source is only a fallback
        let timing = match &event {
            PerformanceEvent::Lifecycle { timing, .. } => {
                timing.or_else(|| source.navigation_timing())
            }
            _ => None,
        };

        let mut guard = lock(&state);
        if guard.stopped {
            break;
        }
        let state = &mut *guard;

        let changed = match &event {
            PerformanceEvent::Entry { entry } => match entry.to_sample() {
                Some(sample) => state.aggregator.apply_sample(&sample),
                None => false,
            },
            PerformanceEvent::Sample { sample } => state.aggregator.apply_sample(sample),
            PerformanceEvent::Lifecycle { signal, .. } => match timing {
                Some(timing) => state.aggregator.apply_navigation(&timing),
                None => {
                    debug!(?signal, "No navigation timing at lifecycle checkpoint");
                    false
                }
            },
        };

        if !changed {
            continue;
        }

        let snapshot = state.aggregator.snapshot();
        if debug_mode {
            debug!(?event, rating = ?snapshot.rating, "[Web Vitals] snapshot updated");
        }
        if let Some(callback) = state.callback.as_mut() {
            callback(snapshot);
        }
        publisher.send_replace(snapshot.clone());
    }
    debug!("Metrics collection loop finished");
}

impl CollectorHandle {
    fn inactive(state: Arc<Mutex<CollectorState>>, updates: watch::Receiver<MetricsSnapshot>) -> Self {
        lock(&state).stopped = true;
        Self {
            state,
            updates,
            source: None,
            task: None,
        }
    }

    /// Copy of the current snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        lock(&self.state).aggregator.snapshot().clone()
    }

    /// Receiver that observes every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<MetricsSnapshot> {
        self.updates.clone()
    }

    /// True while events are being collected
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished()) && !lock(&self.state).stopped
    }

    /// Stop collecting. Safe to call more than once.
    ///
    /// The callback is released under the same lock the collection loop
    /// holds while invoking it, so no callback runs after this returns.
    pub fn stop(&mut self) {
        {
            let mut state = lock(&self.state);
            state.stopped = true;
            state.callback = None;
        }
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Metrics collection stopped");
        }
        if let Some(source) = self.source.take() {
            source.disconnect();
        }
    }
}

impl Drop for CollectorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
