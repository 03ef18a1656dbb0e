//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out,
//! and the built-in [`LogWriter`] (feature `logging`).
//!
//! ## Architecture
//! ```text
//! Coordinator ── publish(Event) ──► Bus ──► Monitor listener ──► SubscriberSet
//!                                                                    │
//!                                                       ┌────────────┼───────────┐
//!                                                       ▼            ▼           ▼
//!                                                   LogWriter     Metrics      Custom
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use callvisor::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct Suppressions;
//!
//! #[async_trait]
//! impl Subscribe for Suppressions {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::InvocationSuppressed {
//!             // increment a counter
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "suppressions" }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
