//! Coordinator events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by coordinators and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `PreemptCoordinator`, `GateCoordinator`, `core::runner`,
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the `Monitor` listener (fans out to `SubscriberSet`), or any
//!   receiver obtained with [`Bus::subscribe`].

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
