//! # Gate (single-flight, drop-on-busy) coordinator.
//!
//! [`GateCoordinator`] admits one invocation at a time and **drops** every
//! invocation that arrives while the gate is closed. Nothing is queued.
//!
//! ## State
//! ```text
//! holder: Option<id>
//!
//! invoke(x) ─► lock ─► holder.is_some()? ──yes──► Suppressed (work never started)
//!                          │no
//!                          └► holder = id ─► unlock ─► run work(x, signal)
//!                                                            │
//!                      ReleasePolicy::Auto:   completion ─► holder = None iff holder == id
//!                      ReleasePolicy::Manual: completion ─► (gate stays closed)
//!
//! release() ─► Manual: holder = None (no-op when already open)
//!              Auto:   no-op
//! ```
//!
//! ## Rules
//! - Admission is a check-and-set under one lock: two calls can never both see the gate open.
//! - Automatic clear compares invocation ids, so a completion never re-opens a gate
//!   that was re-opened by `release()` and taken by a newer invocation.
//! - `release()` only acts under `ReleasePolicy::Manual`. It is idempotent and may be
//!   called from any task. An auto gate ignores it, so it never runs two units of work.
//! - Calling `release()` on a manual gate while the admitted unit of work is still
//!   running opens the gate early: the next `invoke` is admitted and two units of work
//!   overlap. Callers that own the busy window are trusted with this.
//! - Under `ReleasePolicy::Auto`, dropping an admitted `invoke` future re-opens the gate.

use std::fmt::Display;
use std::sync::Mutex;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{
    error::InvokeError,
    events::EventKind,
    outcome::Outcome,
    policies::ReleasePolicy,
    work::WorkRef,
};

use super::runner::{self, Emitter, lock};

/// Bookkeeping guarded by the coordinator's mutex.
#[derive(Default)]
struct GateState {
    /// Last issued invocation id (ids start at 1).
    last_id: u64,
    /// Invocation currently holding the gate.
    holder: Option<u64>,
}

impl GateState {
    /// Closes the gate for a new invocation, or returns `None` if busy.
    fn try_admit(&mut self) -> Option<u64> {
        if self.holder.is_some() {
            return None;
        }
        self.last_id += 1;
        self.holder = Some(self.last_id);
        self.holder
    }

    /// Opens the gate only if `id` still holds it.
    fn release_if(&mut self, id: u64) -> bool {
        if self.holder == Some(id) {
            self.holder = None;
            true
        } else {
            false
        }
    }
}

/// Coordinator that drops new invocations while one is in flight.
///
/// Typical use: a submit button, where a second click while the first request
/// is pending must not send a second request.
///
/// ## Example
/// ```rust
/// use callvisor::{CancelSignal, GateCoordinator, Outcome, ReleasePolicy, WorkFn};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let submit = GateCoordinator::builder(WorkFn::arc("submit", |form: &'static str, _s: CancelSignal| async move {
///     Ok::<_, std::io::Error>(form.len())
/// }))
/// .with_release(ReleasePolicy::Manual)
/// .build();
///
/// assert_eq!(submit.invoke("a").await.unwrap(), Outcome::Success(1));
/// assert_eq!(submit.invoke("b").await.unwrap(), Outcome::Suppressed);
/// submit.release();
/// assert_eq!(submit.invoke("cc").await.unwrap(), Outcome::Success(2));
/// # }
/// ```
pub struct GateCoordinator<I, T, E> {
    work: WorkRef<I, T, E>,
    emitter: Emitter,
    timeout: Option<Duration>,
    release: ReleasePolicy,
    state: Mutex<GateState>,
}

impl<I, T, E> GateCoordinator<I, T, E>
where
    I: Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    /// Creates a gate with [`ReleasePolicy::Auto`], default config and a private bus.
    pub fn new(work: WorkRef<I, T, E>) -> Self {
        Self::builder(work).build()
    }

    pub(crate) fn from_parts(
        work: WorkRef<I, T, E>,
        emitter: Emitter,
        timeout: Option<Duration>,
        release: ReleasePolicy,
    ) -> Self {
        Self {
            work,
            emitter,
            timeout,
            release,
            state: Mutex::new(GateState::default()),
        }
    }

    /// Coordinator name (from config), as reported in events.
    pub fn name(&self) -> &str {
        self.emitter.name()
    }

    /// Release policy this gate was built with.
    pub fn release_policy(&self) -> ReleasePolicy {
        self.release
    }

    /// Runs the unit of work if the gate is open, otherwise drops the call.
    ///
    /// Resolves with:
    /// - `Ok(Outcome::Suppressed)` immediately if busy (the work is never started)
    /// - `Ok(Outcome::Success(v))` if admitted and the work succeeded
    /// - `Err(InvokeError::Failed(e))` if admitted and the work failed, `e` unchanged
    /// - `Err(InvokeError::Timeout { .. })` if admitted and the configured timeout fired
    pub async fn invoke(&self, input: I) -> Result<Outcome<T>, InvokeError<E>> {
        let admitted = lock(&self.state).try_admit();
        let Some(id) = admitted else {
            self.emitter.publish(EventKind::InvocationSuppressed, None);
            return Ok(Outcome::Suppressed);
        };

        let mut guard = GateGuard {
            state: &self.state,
            id,
            armed: self.release.releases_on_completion(),
        };
        let token = CancellationToken::new();

        let completion =
            runner::run_once(&self.work, input, &token, self.timeout, id, &self.emitter).await;

        let res = {
            let mut st = lock(&self.state);
            let res = runner::settle(&token, completion);
            if guard.armed {
                st.release_if(id);
                guard.armed = false;
            }
            res
        };

        runner::publish_settled(&self.emitter, id, &res);
        res
    }

    /// Opens a manual gate regardless of whether the admitted work has finished.
    ///
    /// Returns `true` if the gate was closed. Calling it while open is a no-op.
    /// Under [`ReleasePolicy::Auto`] only completion opens the gate, so this
    /// always returns `false`.
    pub fn release(&self) -> bool {
        if self.release.releases_on_completion() {
            return false;
        }
        let prev = lock(&self.state).holder.take();
        match prev {
            Some(id) => {
                self.emitter.publish(EventKind::GateReleased, Some(id));
                true
            }
            None => false,
        }
    }
}

/// Re-opens the gate if an admitted `invoke` future is dropped (auto policy only).
struct GateGuard<'a> {
    state: &'a Mutex<GateState>,
    id: u64,
    armed: bool,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            lock(self.state).release_if(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CancelSignal, Config, WorkFn, events::Bus};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    type Gate = GateCoordinator<u64, u64, String>;

    /// Sleeps `ms` milliseconds and counts how many times it actually started.
    fn counting(release: ReleasePolicy) -> (Arc<Gate>, Arc<AtomicUsize>) {
        let started = Arc::new(AtomicUsize::new(0));
        let s = Arc::clone(&started);
        let gate: Gate = GateCoordinator::builder(WorkFn::arc(
            "counting",
            move |ms: u64, _signal: CancelSignal| {
                s.fetch_add(1, Ordering::SeqCst);
                async move {
                    sleep(Duration::from_millis(ms)).await;
                    Ok::<_, String>(ms)
                }
            },
        ))
        .with_release(release)
        .build();
        (Arc::new(gate), started)
    }

    fn spawn_invoke(
        g: &Arc<Gate>,
        input: u64,
    ) -> tokio::task::JoinHandle<Result<Outcome<u64>, InvokeError<String>>> {
        let g = Arc::clone(g);
        tokio::spawn(async move { g.invoke(input).await })
    }

    #[tokio::test(start_paused = true)]
    async fn busy_gate_suppresses_without_starting_work() {
        let (g, started) = counting(ReleasePolicy::Auto);

        let first = spawn_invoke(&g, 50);
        sleep(Duration::from_millis(5)).await;

        assert_eq!(g.invoke(1).await.unwrap(), Outcome::Suppressed);
        assert_eq!(g.invoke(2).await.unwrap(), Outcome::Suppressed);
        assert_eq!(first.await.unwrap().unwrap(), Outcome::Success(50));
        assert_eq!(started.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_release_admits_next_call() {
        let (g, started) = counting(ReleasePolicy::Auto);
        assert_eq!(g.invoke(10).await.unwrap(), Outcome::Success(10));
        assert_eq!(g.invoke(20).await.unwrap(), Outcome::Success(20));
        assert_eq!(started.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_release_keeps_gate_closed_until_released() {
        let (g, started) = counting(ReleasePolicy::Manual);

        assert_eq!(g.invoke(0).await.unwrap(), Outcome::Success(0));
        assert_eq!(g.invoke(0).await.unwrap(), Outcome::Suppressed);

        assert!(g.release());
        assert_eq!(g.invoke(3).await.unwrap(), Outcome::Success(3));
        assert_eq!(started.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn release_is_idempotent() {
        let (g, _) = counting(ReleasePolicy::Manual);
        assert!(!g.release(), "open gate: release is a no-op");

        g.invoke(0).await.unwrap();
        assert!(g.release());
        assert!(!g.release());
        assert_eq!(g.invoke(0).await.unwrap(), Outcome::Success(0));
    }

    #[tokio::test(start_paused = true)]
    async fn early_release_admits_overlapping_work() {
        let (g, started) = counting(ReleasePolicy::Manual);

        let first = spawn_invoke(&g, 100);
        sleep(Duration::from_millis(5)).await;
        assert!(g.release());

        let second = spawn_invoke(&g, 10);
        sleep(Duration::from_millis(1)).await;
        assert_eq!(started.load(Ordering::SeqCst), 2);

        assert_eq!(second.await.unwrap().unwrap(), Outcome::Success(10));
        assert_eq!(first.await.unwrap().unwrap(), Outcome::Success(100));
    }

    #[tokio::test(start_paused = true)]
    async fn auto_gate_ignores_release_while_busy() {
        let (g, started) = counting(ReleasePolicy::Auto);

        let first = spawn_invoke(&g, 50);
        sleep(Duration::from_millis(1)).await;
        assert!(!g.release());

        let second = spawn_invoke(&g, 50);
        assert_eq!(second.await.unwrap().unwrap(), Outcome::Suppressed);
        assert_eq!(started.load(Ordering::SeqCst), 1);

        assert_eq!(first.await.unwrap().unwrap(), Outcome::Success(50));
        assert!(!g.release(), "open auto gate: release is a no-op");
        assert_eq!(g.invoke(1).await.unwrap(), Outcome::Success(1));
    }

    #[test]
    fn stale_id_cannot_reopen_newer_holder() {
        let mut st = GateState::default();
        let first = st.try_admit().unwrap();
        st.holder = None;
        let second = st.try_admit().unwrap();

        assert!(!st.release_if(first));
        assert_eq!(st.holder, Some(second));
        assert!(st.try_admit().is_none());
        assert!(st.release_if(second));
    }

    #[tokio::test]
    async fn failure_propagates_and_reopens_gate() {
        let g: Gate = GateCoordinator::new(WorkFn::arc(
            "failing",
            |n: u64, _signal: CancelSignal| async move {
                if n == 0 {
                    return Err("bad input".to_string());
                }
                Ok(n)
            },
        ));

        match g.invoke(0).await {
            Err(InvokeError::Failed(e)) => assert_eq!(e, "bad input"),
            other => panic!("expected Failed, got {other:?}"),
        }
        assert_eq!(g.invoke(4).await.unwrap(), Outcome::Success(4));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_reopens_auto_gate() {
        let started = Arc::new(AtomicUsize::new(0));
        let s = Arc::clone(&started);
        let g: Gate = GateCoordinator::builder(WorkFn::arc(
            "slow",
            move |ms: u64, _signal: CancelSignal| {
                s.fetch_add(1, Ordering::SeqCst);
                async move {
                    sleep(Duration::from_millis(ms)).await;
                    Ok::<_, String>(ms)
                }
            },
        ))
        .with_config(Config {
            timeout: Duration::from_millis(30),
            ..Config::named("slow")
        })
        .build();

        assert!(g.invoke(1_000).await.unwrap_err().is_timeout());
        assert_eq!(g.invoke(5).await.unwrap(), Outcome::Success(5));
        assert_eq!(started.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_invoke_reopens_auto_gate() {
        let (g, _) = counting(ReleasePolicy::Auto);
        let h = spawn_invoke(&g, 100);
        sleep(Duration::from_millis(5)).await;
        h.abort();
        let _ = h.await;

        assert_eq!(g.invoke(1).await.unwrap(), Outcome::Success(1));
    }

    #[tokio::test(start_paused = true)]
    async fn instances_are_independent() {
        let (a, _) = counting(ReleasePolicy::Manual);
        let (b, _) = counting(ReleasePolicy::Manual);

        a.invoke(0).await.unwrap();
        assert_eq!(b.invoke(7).await.unwrap(), Outcome::Success(7));
        assert_eq!(a.invoke(0).await.unwrap(), Outcome::Suppressed);
    }

    #[tokio::test]
    async fn publishes_suppression_and_release() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let g: Gate = GateCoordinator::builder(WorkFn::arc(
            "instant",
            |n: u64, _signal: CancelSignal| async move { Ok::<_, String>(n) },
        ))
        .with_config(Config::named("submit"))
        .with_bus(bus)
        .with_release(ReleasePolicy::Manual)
        .build();

        g.invoke(1).await.unwrap();
        g.invoke(2).await.unwrap();
        g.release();

        let kinds: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|ev| (ev.kind, ev.invocation))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (EventKind::InvocationStarted, Some(1)),
                (EventKind::InvocationSucceeded, Some(1)),
                (EventKind::InvocationSuppressed, None),
                (EventKind::GateReleased, Some(1)),
            ]
        );
    }
}
