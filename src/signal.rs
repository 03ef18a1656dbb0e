//! # Observe-only cancellation signal.
//!
//! Every invocation a coordinator accepts gets a fresh [`CancellationToken`].
//! The coordinator keeps the token; the unit of work receives a [`CancelSignal`]
//! view that can only **observe** cancellation.
//!
//! ## Rules
//! - Cancellation is requested only by the coordinator that created the token.
//! - The signal transitions to cancelled at most once.
//! - Cancelling after the invocation completed has no observable effect.
//!
//! ## Example
//! ```rust
//! use callvisor::{CancelSignal, WorkFn, WorkRef};
//!
//! let work: WorkRef<u64, u64, std::io::Error> =
//!     WorkFn::arc("double", |n: u64, signal: CancelSignal| async move {
//!         if signal.is_cancelled() {
//!             return Ok(0);
//!         }
//!         Ok::<_, std::io::Error>(n * 2)
//!     });
//! assert_eq!(work.name(), "double");
//! ```

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Read-only view of one invocation's cancellation token.
///
/// Cheap to clone. Clones observe the same token.
#[derive(Clone, Debug)]
pub struct CancelSignal {
    token: CancellationToken,
}

impl CancelSignal {
    pub(crate) fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Returns `true` once the coordinator has requested cancellation.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves when cancellation is requested.
    ///
    /// Resolves immediately if it already was. Intended for `tokio::select!`
    /// next to the actual I/O future.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    /// A signal that is never cancelled.
    ///
    /// Useful for calling a unit of work directly, outside any coordinator.
    pub fn never() -> Self {
        Self::new(CancellationToken::new())
    }
}
