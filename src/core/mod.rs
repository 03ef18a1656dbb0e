//! Coordinators and the event monitor.
//!
//! Public API from this module: [`PreemptCoordinator`], [`GateCoordinator`],
//! their builders, and [`Monitor`].
//!
//! Internal modules:
//! - [`runner`]: runs one invocation with timeout, settles it, publishes events;
//! - [`preempt`]: preempt-latest coordinator (active slot with identity-checked cleanup);
//! - [`gate`]: single-flight, drop-on-busy coordinator with auto/manual release;
//! - [`builder`]: fluent construction from [`Config`](crate::Config) and an optional shared bus;
//! - [`monitor`]: bus → subscriber fan-out.

mod builder;
mod gate;
mod monitor;
mod preempt;
mod runner;

pub use builder::{GateBuilder, PreemptBuilder};
pub use gate::GateCoordinator;
pub use monitor::{Monitor, MonitorBuilder};
pub use preempt::PreemptCoordinator;
