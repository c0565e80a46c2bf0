//! Contracts with the hosting environment
//!
//! A [`PerformanceSource`] is anything that can deliver performance events
//! for the observed entry categories and expose navigation timing. The
//! collector only ever talks to this trait, so browsers, replayed traces and
//! test doubles all plug in the same way.
//!
//! [`ChannelSource`] is the in-process implementation: its paired
//! [`PerformanceFeed`] pushes events into a bounded `tokio::sync::mpsc` queue
//! that the collector drains.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use shared_types::{MetricSample, NavigationTiming};
use tokio::sync::mpsc;
use tracing::debug;

use crate::entries::PerformanceEntry;
use crate::error::CollectorError;

/// Entry categories the collector registers interest in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryType {
    LargestContentfulPaint,
    FirstInput,
    LayoutShift,
    Paint,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::LargestContentfulPaint => "largest-contentful-paint",
            EntryType::FirstInput => "first-input",
            EntryType::LayoutShift => "layout-shift",
            EntryType::Paint => "paint",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All categories the collector observes
pub const OBSERVED_ENTRY_TYPES: [EntryType; 4] = [
    EntryType::LargestContentfulPaint,
    EntryType::FirstInput,
    EntryType::LayoutShift,
    EntryType::Paint,
];

/// Page lifecycle checkpoints at which navigation timing is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleSignal {
    /// The page has fully loaded
    Loaded,
    /// The page is about to unload
    BeforeUnload,
}

/// One item on the collector's event queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PerformanceEvent {
    /// Raw observer entry, translated by the collector
    Entry { entry: PerformanceEntry },
    /// Ready-made sample, e.g. INP from an interaction-latency library
    Sample { sample: MetricSample },
    /// Lifecycle checkpoint, with the navigation timing current when it was sent
    Lifecycle {
        signal: LifecycleSignal,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timing: Option<NavigationTiming>,
    },
}

impl From<PerformanceEntry> for PerformanceEvent {
    fn from(entry: PerformanceEntry) -> Self {
        PerformanceEvent::Entry { entry }
    }
}

impl From<MetricSample> for PerformanceEvent {
    fn from(sample: MetricSample) -> Self {
        PerformanceEvent::Sample { sample }
    }
}

impl From<LifecycleSignal> for PerformanceEvent {
    fn from(signal: LifecycleSignal) -> Self {
        PerformanceEvent::Lifecycle {
            signal,
            timing: None,
        }
    }
}

/// Environment capable of delivering performance events
pub trait PerformanceSource: Send + Sync {
    /// Register interest in `entry_types` and hand back the event queue.
    ///
    /// An error means the environment cannot observe performance at all.
    fn subscribe(
        &self,
        entry_types: &[EntryType],
    ) -> Result<mpsc::Receiver<PerformanceEvent>, CollectorError>;

    /// Current navigation timing, if the environment exposes it
    fn navigation_timing(&self) -> Option<NavigationTiming>;

    /// Stop observing. Called once by the collector on stop.
    fn disconnect(&self) {}
}

/// Environment without any performance observation support
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedSource;

impl PerformanceSource for UnsupportedSource {
    fn subscribe(
        &self,
        _entry_types: &[EntryType],
    ) -> Result<mpsc::Receiver<PerformanceEvent>, CollectorError> {
        Err(CollectorError::Unsupported(
            "no performance observer available".to_string(),
        ))
    }

    fn navigation_timing(&self) -> Option<NavigationTiming> {
        None
    }
}

/// In-process performance source backed by a bounded channel
pub struct ChannelSource {
    receiver: Mutex<Option<mpsc::Receiver<PerformanceEvent>>>,
    timing: Arc<Mutex<Option<NavigationTiming>>>,
    connected: Arc<AtomicBool>,
}

/// Producer half of a [`ChannelSource`]
#[derive(Clone)]
pub struct PerformanceFeed {
    sender: mpsc::Sender<PerformanceEvent>,
    timing: Arc<Mutex<Option<NavigationTiming>>>,
    connected: Arc<AtomicBool>,
}

impl ChannelSource {
    /// Create a source whose queue holds up to `capacity` pending events
    pub fn new(capacity: usize) -> (Self, PerformanceFeed) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let timing = Arc::new(Mutex::new(None));
        let connected = Arc::new(AtomicBool::new(true));

        let source = Self {
            receiver: Mutex::new(Some(receiver)),
            timing: timing.clone(),
            connected: connected.clone(),
        };
        let feed = PerformanceFeed {
            sender,
            timing,
            connected,
        };
        (source, feed)
    }
}

impl PerformanceSource for ChannelSource {
    fn subscribe(
        &self,
        entry_types: &[EntryType],
    ) -> Result<mpsc::Receiver<PerformanceEvent>, CollectorError> {
        if !self.connected.load(Ordering::Acquire) {
            return Err(CollectorError::Disconnected);
        }
        let receiver = lock(&self.receiver)
            .take()
            .ok_or(CollectorError::AlreadySubscribed)?;
        debug!(entry_types = ?entry_types, "Channel source subscribed");
        Ok(receiver)
    }

    fn navigation_timing(&self) -> Option<NavigationTiming> {
        *lock(&self.timing)
    }

    fn disconnect(&self) {
        self.connected.store(false, Ordering::Release);
        debug!("Channel source disconnected");
    }
}

impl PerformanceFeed {
    /// Queue an event, waiting for room if the queue is full
    ///
    /// A lifecycle checkpoint without timing is stamped with the navigation
    /// timing published so far, so later timing updates cannot rewrite it.
    pub async fn send(&self, event: impl Into<PerformanceEvent>) -> Result<(), CollectorError> {
        if !self.is_connected() {
            return Err(CollectorError::Disconnected);
        }
        let event = match event.into() {
            PerformanceEvent::Lifecycle {
                signal,
                timing: None,
            } => PerformanceEvent::Lifecycle {
                signal,
                timing: *lock(&self.timing),
            },
            event => event,
        };
        self.sender
            .send(event)
            .await
            .map_err(|_| CollectorError::Disconnected)
    }

    /// Publish navigation timing for the next lifecycle checkpoint to read
    pub fn set_navigation_timing(&self, timing: NavigationTiming) {
        *lock(&self.timing) = Some(timing);
    }

    /// False once the collector has stopped observing
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire) && !self.sender.is_closed()
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
