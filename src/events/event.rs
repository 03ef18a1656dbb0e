//! # Events emitted by coordinators.
//!
//! The [`EventKind`] enum classifies event types across two categories:
//! - **Invocation events**: one invocation's flow (started, preempted, succeeded, cancelled, failed, suppressed, timeout)
//! - **Gate events**: explicit gate release
//! - **Subscriber events**: delivery problems inside the [`SubscriberSet`](crate::SubscriberSet)
//!
//! The [`Event`] struct carries metadata such as timestamps, the coordinator
//! name, the invocation id, and reasons.
//!
//! ## Ordering guarantees
//! `seq` comes from one process-wide counter, so events from coordinators
//! sharing a monitor (or not) can be merged back into publish order.
//!
//! ## Example
//! ```rust
//! use callvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::InvocationFailed)
//!     .with_coordinator("search")
//!     .with_invocation(3)
//!     .with_reason("connection refused");
//!
//! assert_eq!(ev.kind, EventKind::InvocationFailed);
//! assert_eq!(ev.coordinator.as_deref(), Some("search"));
//! assert_eq!(ev.invocation, Some(3));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of coordinator events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// A subscriber's `on_event` panicked; the worker keeps running.
    ///
    /// Sets:
    /// - `coordinator`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// An event could not be queued for a subscriber (`full` / `closed` / `lagged`).
    ///
    /// Sets:
    /// - `coordinator`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Invocation events ===
    /// An invocation was accepted and its unit of work is starting.
    ///
    /// Sets:
    /// - `coordinator`: coordinator name
    /// - `invocation`: per-coordinator invocation id (1-based)
    InvocationStarted,

    /// Cancellation was signalled to an active invocation because a newer one arrived
    /// (or `cancel()` was called).
    ///
    /// Sets:
    /// - `coordinator`, `invocation` (the one being cancelled)
    InvocationPreempted,

    /// The unit of work completed and its value was delivered.
    ///
    /// Sets:
    /// - `coordinator`, `invocation`
    InvocationSucceeded,

    /// The invocation resolved as cancelled; its result was discarded.
    ///
    /// Sets:
    /// - `coordinator`, `invocation`
    InvocationCancelled,

    /// The unit of work failed; the error is propagated to the invoker.
    ///
    /// Sets:
    /// - `coordinator`, `invocation`
    /// - `reason`: failure message (when the error type is displayable)
    InvocationFailed,

    /// The gate was closed; the unit of work was never started.
    ///
    /// Sets:
    /// - `coordinator`
    InvocationSuppressed,

    /// The invocation exceeded its configured timeout.
    ///
    /// Sets:
    /// - `coordinator`, `invocation`
    /// - `timeout_ms`: configured timeout (ms)
    TimeoutHit,

    // === Gate events ===
    /// The gate was opened by an explicit `release()`.
    ///
    /// Sets:
    /// - `coordinator`
    /// - `invocation`: the invocation that was holding the gate
    GateReleased,
}

/// Coordinator event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Process-wide publish order.
    pub seq: u64,
    /// When the event was created.
    pub at: SystemTime,
    /// What happened.
    pub kind: EventKind,
    /// Name of the coordinator (or subscriber, for subscriber events).
    pub coordinator: Option<Arc<str>>,
    /// Per-coordinator invocation id.
    pub invocation: Option<u64>,
    /// Failure message, overflow cause or panic text.
    pub reason: Option<Arc<str>>,
    /// Invocation timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
}

impl Event {
    /// Stamps a fresh event of `kind` with the current time and the next `seq`.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            coordinator: None,
            invocation: None,
            reason: None,
            timeout_ms: None,
        }
    }

    /// Sets `reason`.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a coordinator name.
    #[inline]
    pub fn with_coordinator(mut self, name: impl Into<Arc<str>>) -> Self {
        self.coordinator = Some(name.into());
        self
    }

    /// Attaches an invocation id.
    #[inline]
    pub fn with_invocation(mut self, id: u64) -> Self {
        self.invocation = Some(id);
        self
    }

    /// Records the timeout that fired, in whole milliseconds.
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Reports an event dropped for `subscriber`.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_coordinator(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Reports a panic inside `subscriber`.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_coordinator(subscriber)
            .with_reason(info)
    }

    /// Returns `true` for events produced by the subscriber machinery itself.
    #[inline]
    pub fn is_subscriber_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_monotonic() {
        let a = Event::new(EventKind::InvocationStarted);
        let b = Event::new(EventKind::InvocationSucceeded);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn timeout_saturates_to_u32() {
        let ev = Event::new(EventKind::TimeoutHit).with_timeout(Duration::from_secs(u64::MAX));
        assert_eq!(ev.timeout_ms, Some(u32::MAX));
    }

    #[test]
    fn overflow_event_names_subscriber() {
        let ev = Event::subscriber_overflow("audit", "full");
        assert!(ev.is_subscriber_event());
        assert_eq!(ev.coordinator.as_deref(), Some("audit"));
        assert_eq!(ev.reason.as_deref(), Some("subscriber=audit reason=full"));
    }
}
