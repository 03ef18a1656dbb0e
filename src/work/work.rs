//! # Unit-of-work trait.
//!
//! A coordinator never constructs or owns the operation it schedules; it only
//! calls [`Work::spawn`] with the caller's input and a fresh [`CancelSignal`].
//! The returned future is owned by the invocation and may outlive the
//! coordinator's interest in it (a superseded invocation keeps running until it
//! observes the signal).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::signal::CancelSignal;

/// Boxed future produced by one invocation of a unit of work.
pub type BoxWorkFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'static>>;

/// # Shared handle to a unit of work.
///
/// This is the type coordinators hold.
pub type WorkRef<I, T, E> = Arc<dyn Work<I, Output = T, Error = E>>;

/// # Asynchronous, cancel-aware operation.
///
/// Implementors should check the signal at their await points and return
/// promptly once it is cancelled. What they return after cancellation is
/// discarded by the coordinator, so any value (or error) will do.
///
/// # Example
/// ```
/// use callvisor::{BoxWorkFuture, CancelSignal, Work};
///
/// struct Lookup;
///
/// impl Work<String> for Lookup {
///     type Output = usize;
///     type Error = std::io::Error;
///
///     fn name(&self) -> &str { "lookup" }
///
///     fn spawn(&self, query: String, signal: CancelSignal) -> BoxWorkFuture<usize, std::io::Error> {
///         Box::pin(async move {
///             if signal.is_cancelled() {
///                 return Ok(0);
///             }
///             Ok(query.len())
///         })
///     }
/// }
/// ```
pub trait Work<I>: Send + Sync + 'static {
    /// Value produced on success.
    type Output;
    /// Error produced on failure; surfaced unchanged to the invoker.
    type Error;

    /// Returns a stable, human-readable name.
    fn name(&self) -> &str;

    /// Creates a new future for one invocation.
    fn spawn(&self, input: I, signal: CancelSignal) -> BoxWorkFuture<Self::Output, Self::Error>;
}
