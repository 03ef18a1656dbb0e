//! # Closure-backed unit of work (`WorkFn`)
//!
//! [`WorkFn`] wraps a closure `F: Fn(I, CancelSignal) -> Fut`, producing a fresh
//! future per invocation. No state is shared between invocations unless the
//! closure captures an `Arc<...>` explicitly.
//!
//! ## Example
//! ```rust
//! use callvisor::{CancelSignal, WorkFn, WorkRef};
//!
//! let w: WorkRef<u32, u32, std::convert::Infallible> =
//!     WorkFn::arc("square", |n: u32, _signal: CancelSignal| async move {
//!         Ok::<_, std::convert::Infallible>(n * n)
//!     });
//!
//! assert_eq!(w.name(), "square");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use crate::signal::CancelSignal;
use crate::work::work::{BoxWorkFuture, Work};

/// Function-backed unit of work.
///
/// Wraps a closure that *creates* a new future per invocation.
#[derive(Debug)]
pub struct WorkFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> WorkFn<F> {
    /// Creates a new function-backed unit of work.
    ///
    /// Prefer [`WorkFn::arc`] when you immediately need a [`WorkRef`](crate::WorkRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the unit of work and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<I, F, Fut, T, E> Work<I> for WorkFn<F>
where
    F: Fn(I, CancelSignal) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    type Output = T;
    type Error = E;

    fn name(&self) -> &str {
        &self.name
    }

    fn spawn(&self, input: I, signal: CancelSignal) -> BoxWorkFuture<T, E> {
        let fut = (self.f)(input, signal);
        Box::pin(fut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WorkRef;

    #[tokio::test]
    async fn spawns_fresh_future_per_call() {
        let w: WorkRef<u32, u32, String> = WorkFn::arc("add-one", |n: u32, _s: CancelSignal| async move {
            Ok::<_, String>(n + 1)
        });

        assert_eq!(w.spawn(1, CancelSignal::never()).await, Ok(2));
        assert_eq!(w.spawn(41, CancelSignal::never()).await, Ok(42));
    }

    #[tokio::test]
    async fn passes_signal_through() {
        let w = WorkFn::new("observe", |_: (), s: CancelSignal| async move {
            Ok::<_, String>(s.is_cancelled())
        });
        assert_eq!(w.spawn((), CancelSignal::never()).await, Ok(false));
    }
}
