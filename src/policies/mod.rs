//! Coordination policies.
//!
//! ## Contents
//! - [`ReleasePolicy`] when a gate coordinator re-opens (on completion / on explicit release)
//!
//! ## Quick wiring
//! ```text
//! GateCoordinator::builder(work).with_release(ReleasePolicy::Manual)
//!      └─► core::gate uses:
//!           - releases_on_completion() to decide whether to clear busy after the work
//! ```
//!
//! ## Defaults
//! - `ReleasePolicy::Auto`.

mod release;

pub use release::ReleasePolicy;
