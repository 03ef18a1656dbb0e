//! # Preempt-latest coordinator.
//!
//! [`PreemptCoordinator`] lets only the most recent invocation run to
//! completion. A new `invoke` signals cancellation to the active invocation
//! (without waiting for it) and takes over the active slot.
//!
//! ## State
//! ```text
//! active: Option<(id, token)>
//!
//! invoke(x) ─► lock ─► next id ─► swap active ─► unlock ─► cancel previous token
//!                                                       └► run work(x, signal)
//!                                                              │
//! completion ─► lock ─► settle (cancelled? → Cancelled) ─► clear active iff active.id == id
//! ```
//!
//! ## Rules
//! - At most one non-cancelled, non-completed invocation per instance.
//! - Cancellation is cooperative: a superseded unit of work keeps running until it
//!   observes its signal; whatever it returns is discarded and the call resolves
//!   [`Outcome::Cancelled`].
//! - Completion cleanup compares invocation ids, so a late superseded completion
//!   never clears a newer invocation's slot.
//! - Dropping an `invoke` future before it completes cancels that invocation's
//!   token and frees the slot (if it is still the active one).

use std::fmt::Display;
use std::sync::Mutex;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{
    error::InvokeError,
    events::EventKind,
    outcome::Outcome,
    work::WorkRef,
};

use super::runner::{self, Emitter, lock};

/// Record of the invocation currently holding the slot.
struct Active {
    id: u64,
    token: CancellationToken,
}

/// Bookkeeping guarded by the coordinator's mutex.
#[derive(Default)]
struct PreemptState {
    /// Last issued invocation id (ids start at 1).
    last_id: u64,
    active: Option<Active>,
}

impl PreemptState {
    /// Clears the slot only if `id` still owns it.
    fn clear_if(&mut self, id: u64) -> bool {
        if self.active.as_ref().is_some_and(|a| a.id == id) {
            self.active = None;
            true
        } else {
            false
        }
    }
}

/// Coordinator that cancels the in-flight invocation whenever a new one arrives.
///
/// Typical use: search-as-you-type, where only the response for the latest
/// query matters.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use callvisor::{CancelSignal, Outcome, PreemptCoordinator, WorkFn};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let search = PreemptCoordinator::new(WorkFn::arc("search", |q: String, signal: CancelSignal| async move {
///     tokio::select! {
///         _ = signal.cancelled() => Ok(Vec::new()),
///         _ = tokio::time::sleep(Duration::from_millis(5)) => Ok::<_, std::io::Error>(vec![q]),
///     }
/// }));
///
/// let res = search.invoke("rust".to_string()).await.unwrap();
/// assert_eq!(res, Outcome::Success(vec!["rust".to_string()]));
/// # }
/// ```
pub struct PreemptCoordinator<I, T, E> {
    work: WorkRef<I, T, E>,
    emitter: Emitter,
    timeout: Option<Duration>,
    state: Mutex<PreemptState>,
}

impl<I, T, E> PreemptCoordinator<I, T, E>
where
    I: Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    /// Creates a coordinator with default [`Config`](crate::Config) and a private bus.
    pub fn new(work: WorkRef<I, T, E>) -> Self {
        Self::builder(work).build()
    }

    pub(crate) fn from_parts(work: WorkRef<I, T, E>, emitter: Emitter, timeout: Option<Duration>) -> Self {
        Self {
            work,
            emitter,
            timeout,
            state: Mutex::new(PreemptState::default()),
        }
    }

    /// Coordinator name (from config), as reported in events.
    pub fn name(&self) -> &str {
        self.emitter.name()
    }

    /// Starts a new invocation, cancelling the active one if any.
    ///
    /// Resolves with:
    /// - `Ok(Outcome::Success(v))` if this invocation completed without being superseded
    /// - `Ok(Outcome::Cancelled)` if a newer invocation (or [`cancel`](Self::cancel)) superseded it
    /// - `Err(InvokeError::Failed(e))` if the unit of work failed, `e` unchanged
    /// - `Err(InvokeError::Timeout { .. })` if the configured timeout fired first
    pub async fn invoke(&self, input: I) -> Result<Outcome<T>, InvokeError<E>> {
        let (id, token) = self.begin();
        let mut guard = SlotGuard {
            state: &self.state,
            id,
            token: token.clone(),
            armed: true,
        };

        let completion =
            runner::run_once(&self.work, input, &token, self.timeout, id, &self.emitter).await;

        let res = {
            let mut st = lock(&self.state);
            let res = runner::settle(&token, completion);
            st.clear_if(id);
            res
        };
        guard.armed = false;

        runner::publish_settled(&self.emitter, id, &res);
        res
    }

    /// Cancels the active invocation without starting a new one.
    ///
    /// Returns `true` if an invocation was active. Idempotent.
    pub fn cancel(&self) -> bool {
        let prev = lock(&self.state).active.take();
        match prev {
            Some(prev) => {
                self.preempt(prev);
                true
            }
            None => false,
        }
    }

    /// Records a fresh invocation as active and cancels the one it replaces.
    fn begin(&self) -> (u64, CancellationToken) {
        let token = CancellationToken::new();
        let (id, prev) = {
            let mut st = lock(&self.state);
            st.last_id += 1;
            let id = st.last_id;
            let prev = st.active.replace(Active {
                id,
                token: token.clone(),
            });
            (id, prev)
        };

        if let Some(prev) = prev {
            self.preempt(prev);
        }
        (id, token)
    }

    fn preempt(&self, prev: Active) {
        prev.token.cancel();
        self.emitter
            .publish(EventKind::InvocationPreempted, Some(prev.id));
    }
}

/// Frees the slot if an `invoke` future is dropped mid-flight.
struct SlotGuard<'a> {
    state: &'a Mutex<PreemptState>,
    id: u64,
    token: CancellationToken,
    armed: bool,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.token.cancel();
            lock(self.state).clear_if(self.id);
        }
    }
}
