//! # Monitor: forwards coordinator events to subscribers.
//!
//! The [`Monitor`] owns a [`Bus`] and a [`SubscriberSet`]. Coordinators built
//! with `with_bus(monitor.bus())` publish into it; a listener task fans each
//! event out to every subscriber without awaiting them.
//!
//! ## Architecture
//! ```text
//! PreemptCoordinator ──┐
//! GateCoordinator    ──┼──► Bus ──► listener ──► SubscriberSet::emit(&Event)
//! GateCoordinator    ──┘                          ┌─────────┼─────────┐
//!                                                 ▼         ▼         ▼
//!                                             [queue 1] [queue 2] [queue N]
//! ```
//!
//! ## Rules
//! - Sharing one monitor between coordinators shares only observability, never scheduling state.
//! - [`Monitor::shutdown`] drains events already on the bus before stopping subscribers.
//! - A lagging listener reports `SubscriberOverflow` (reason "lagged") to subscribers.
//! - Reports raised while subscriber queues drain during shutdown are returned
//!   by [`Monitor::shutdown`].
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;

use std::sync::Arc;

use tokio::sync::broadcast::{
    Receiver,
    error::{RecvError, TryRecvError},
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    events::{Bus, Event},
    subscribers::{Subscribe, SubscriberSet},
};

/// What the listener hands back when it stops.
type ListenerParts = (Receiver<Event>, SubscriberSet);

/// Event hub shared by any number of coordinators.
pub struct Monitor {
    bus: Bus,
    subscriber_count: usize,
    token: CancellationToken,
    listener: JoinHandle<ListenerParts>,
}

impl Monitor {
    /// Creates a builder with default bus capacity and no subscribers.
    pub fn builder() -> MonitorBuilder {
        MonitorBuilder::new()
    }

    /// Returns a handle to pass to coordinator builders (`with_bus`).
    pub fn bus(&self) -> Bus {
        self.bus.clone()
    }

    /// Number of attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscriber_count
    }

    /// Stops the listener after forwarding pending events, then drains subscriber queues.
    ///
    /// Subscribers can still fail while their queues drain. The resulting
    /// `SubscriberPanicked` / `SubscriberOverflow` reports, and anything else
    /// published after the listener stopped, are returned instead of being
    /// delivered, since no subscriber is left to receive them.
    pub async fn shutdown(self) -> Vec<Event> {
        self.token.cancel();
        let Ok((mut rx, subs)) = self.listener.await else {
            return Vec::new();
        };
        subs.shutdown().await;

        let mut late = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(ev) => late.push(ev),
                Err(TryRecvError::Lagged(_)) => {
                    late.push(Event::subscriber_overflow("monitor", "lagged"));
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        late
    }

    fn spawn_listener(
        mut rx: Receiver<Event>,
        subs: SubscriberSet,
        token: CancellationToken,
    ) -> JoinHandle<ListenerParts> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    msg = rx.recv() => match msg {
                        Ok(ev) => subs.emit(&ev),
                        Err(RecvError::Lagged(_)) => {
                            subs.emit(&Event::subscriber_overflow("monitor", "lagged"));
                        }
                        Err(RecvError::Closed) => break,
                    },
                    _ = token.cancelled() => break,
                }
            }
            (rx, subs)
        })
    }
}

/// Builder for [`Monitor`].
pub struct MonitorBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl MonitorBuilder {
    fn new() -> Self {
        Self {
            cfg: Config::default(),
            subscribers: Vec::new(),
        }
    }

    /// Uses `cfg.bus_capacity` for the shared bus.
    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets event subscribers.
    ///
    /// Each subscriber gets a dedicated worker with a bounded queue.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the monitor and spawns its listener.
    ///
    /// Must be called inside a tokio runtime.
    pub fn build(self) -> Monitor {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = SubscriberSet::new(self.subscribers, bus.clone());
        let subscriber_count = subs.len();
        let token = CancellationToken::new();
        let listener = Monitor::spawn_listener(bus.subscribe(), subs, token.clone());

        Monitor {
            bus,
            subscriber_count,
            token,
            listener,
        }
    }
}
