//! # Release policies for the gate coordinator.
//!
//! [`ReleasePolicy`] decides what closes the gate's busy window.
//!
//! - [`ReleasePolicy::Auto`] the gate re-opens as soon as the unit of work finishes (default).
//! - [`ReleasePolicy::Manual`] the gate stays closed until
//!   [`GateCoordinator::release`](crate::GateCoordinator::release) is called.
//!
//! ## Choosing the right policy
//!
//! **Self-contained requests** (the response is all that matters):
//! ```text
//! ReleasePolicy::Auto     → work finishes → gate open → next invoke admitted
//! ```
//!
//! **Requests with a follow-up step** (e.g. navigate/render after submit):
//! ```text
//! ReleasePolicy::Manual   → work finishes → gate still closed
//!                         → follow-up done → release() → next invoke admitted
//! ```

/// Policy controlling when an admitted invocation stops holding the gate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReleasePolicy {
    /// Clear busy when the unit of work completes (success, failure or timeout).
    #[default]
    Auto,
    /// Clear busy only through an explicit `release()`.
    Manual,
}

impl ReleasePolicy {
    /// Returns `true` if completion re-opens the gate.
    #[inline]
    pub fn releases_on_completion(self) -> bool {
        matches!(self, ReleasePolicy::Auto)
    }
}
