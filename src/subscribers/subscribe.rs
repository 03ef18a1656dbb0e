//! The [`Subscribe`] trait: how user code observes coordinator events.
//!
//! Subscribers are attached to a [`Monitor`](crate::Monitor). The
//! [`SubscriberSet`](crate::SubscriberSet) gives every subscriber its own
//! queue and worker task, so a slow `on_event` only delays that subscriber.
//! When its queue is full, new events are dropped for it alone and a
//! `SubscriberOverflow` event names it.

use crate::events::Event;
use async_trait::async_trait;

/// Receives coordinator events one at a time, in publish order.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Called once per event on this subscriber's worker.
    async fn on_event(&self, event: &Event);

    /// Label used in `SubscriberOverflow` / `SubscriberPanicked` events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Bound of this subscriber's queue (clamped to at least 1).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
