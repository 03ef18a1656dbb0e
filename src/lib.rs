//! # callvisor
//!
//! **Callvisor** coordinates repeated calls to the same asynchronous operation.
//!
//! It provides two independent coordinators that wrap a caller-supplied unit of
//! work and decide *when* it is allowed to start and what happens to calls that
//! are superseded or suppressed:
//!
//! - [`PreemptCoordinator`] cancels the in-flight call when a new one arrives;
//!   only the latest call delivers a value.
//! - [`GateCoordinator`] drops (never queues) calls that arrive while one is in
//!   flight; a manual gate stays closed until [`release`](GateCoordinator::release).
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐             ┌──────────────┐
//!     │   invoke(x)  │             │   invoke(y)  │
//!     └──────┬───────┘             └──────┬───────┘
//!            ▼                            ▼
//! ┌──────────────────────┐     ┌──────────────────────┐
//! │  PreemptCoordinator  │     │   GateCoordinator    │
//! │  active: (id, token) │     │   holder: Option<id> │
//! └──────────┬───────────┘     └──────────┬───────────┘
//!            │ cancel previous            │ busy? → Suppressed
//!            ▼                            ▼
//!     ┌────────────────────────────────────────────┐
//!     │ runner: work.spawn(input, CancelSignal)    │
//!     │         + optional timeout, settle, events │
//!     └──────────────────────┬─────────────────────┘
//!                            ▼
//!                 Bus (broadcast) ──► Monitor ──► SubscriberSet ──► LogWriter / custom
//! ```
//!
//! ### Outcomes
//! ```text
//! Ok(Outcome::Success(v))        the call ran and produced v
//! Ok(Outcome::Cancelled)         superseded by a newer call (preempt only); result discarded
//! Ok(Outcome::Suppressed)        gate was closed; work never started (gate only)
//! Err(InvokeError::Failed(e))    the work failed; e is the work's own error, unchanged
//! Err(InvokeError::Timeout{..})  the configured timeout fired
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                         |
//! |-------------------|---------------------------------------------------------------|--------------------------------------------|
//! | **Coordinators**  | Preempt-latest and single-flight gate.                        | [`PreemptCoordinator`], [`GateCoordinator`]|
//! | **Work**          | Define units of work as closures or trait impls.              | [`Work`], [`WorkFn`], [`WorkRef`]          |
//! | **Cancellation**  | Observe-only per-invocation signal.                           | [`CancelSignal`]                           |
//! | **Policies**      | Choose what re-opens a gate.                                  | [`ReleasePolicy`]                          |
//! | **Errors**        | Typed failures, distinct from coordination outcomes.          | [`InvokeError`], [`Outcome`]               |
//! | **Events**        | Lifecycle events and subscriber fan-out.                      | [`Event`], [`Subscribe`], [`Monitor`]      |
//! | **Configuration** | Name, timeout, bus capacity.                                  | [`Config`]                                 |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use callvisor::{CancelSignal, Outcome, PreemptCoordinator, WorkFn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let lookup = PreemptCoordinator::new(WorkFn::arc("lookup", |ms: u64, signal: CancelSignal| async move {
//!         tokio::select! {
//!             _ = signal.cancelled() => Ok(0),
//!             _ = tokio::time::sleep(Duration::from_millis(ms)) => Ok::<_, std::io::Error>(ms),
//!         }
//!     }));
//!
//!     let (slow, fast) = tokio::join!(lookup.invoke(100), async {
//!         tokio::time::sleep(Duration::from_millis(5)).await;
//!         lookup.invoke(10).await
//!     });
//!
//!     assert_eq!(slow.unwrap(), Outcome::Cancelled);
//!     assert_eq!(fast.unwrap(), Outcome::Success(10));
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod outcome;
mod policies;
mod signal;
mod subscribers;
mod work;

// ---- Public re-exports ----

pub use config::Config;
pub use crate::core::{
    GateBuilder, GateCoordinator, Monitor, MonitorBuilder, PreemptBuilder, PreemptCoordinator,
};
pub use error::InvokeError;
pub use events::{Bus, Event, EventKind};
pub use outcome::Outcome;
pub use policies::ReleasePolicy;
pub use signal::CancelSignal;
pub use subscribers::{Subscribe, SubscriberSet};
pub use work::{BoxWorkFuture, Work, WorkFn, WorkRef};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
