//! Broadcast bus for coordinator events.
//!
//! Every coordinator owns an emitter that publishes into a [`Bus`]. A bus is
//! either private to one coordinator or shared through
//! [`Monitor::bus`](crate::Monitor::bus):
//!
//! ```text
//! PreemptCoordinator ─┐
//! GateCoordinator    ─┼─ publish ─► Bus ─► Monitor listener ─► SubscriberSet
//! GateCoordinator    ─┘
//! ```
//!
//! Publishing is fire-and-forget. Events sent while nobody is subscribed are
//! discarded, and a receiver that falls more than `capacity` events behind
//! gets `RecvError::Lagged`. Sharing a bus couples only the event streams of
//! its coordinators, never their scheduling state.

use tokio::sync::broadcast;

use super::event::Event;

/// Cloneable handle to a coordinator event channel.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus buffering up to `capacity` events (at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Sends `ev` to current receivers; never blocks or fails.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Opens an independent receiver for events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
