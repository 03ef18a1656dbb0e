//! # Run and settle a single invocation.
//!
//! Shared by both coordinators: executes one unit of work with an optional
//! timeout, then turns the raw completion into the caller-visible result and
//! publishes lifecycle events to the [`Bus`].
//!
//! ## Event flow
//!
//! ```text
//! Success:
//!   InvocationStarted → work → Ok(v)       → InvocationSucceeded
//!
//! Superseded (token cancelled before settle):
//!   InvocationStarted → work → Ok/Err      → InvocationCancelled   (result discarded)
//!
//! Failure:
//!   InvocationStarted → work → Err(e)      → InvocationFailed
//!
//! Timeout:
//!   InvocationStarted → timeout exceeded   → cancel token → TimeoutHit
//!                                                         → InvocationFailed
//! ```
//!
//! ## Rules
//! - Always publishes **exactly one** of `InvocationSucceeded`, `InvocationCancelled`
//!   or `InvocationFailed` per started invocation.
//! - A cancelled token always wins over the work's own result.
//! - A timeout that fires after the token was already cancelled settles as cancelled.

use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::{
    error::InvokeError,
    events::{Bus, Event, EventKind},
    outcome::Outcome,
    signal::CancelSignal,
    work::WorkRef,
};

/// Raw result of running a unit of work, before classification.
pub(crate) enum Completion<T, E> {
    /// The work future resolved.
    Finished(Result<T, E>),
    /// The timeout fired first; the work future was dropped.
    TimedOut(Duration),
}

/// Named event publisher owned by one coordinator.
#[derive(Clone, Debug)]
pub(crate) struct Emitter {
    name: Arc<str>,
    bus: Bus,
}

impl Emitter {
    pub(crate) fn new(name: &str, bus: Bus) -> Self {
        Self {
            name: Arc::from(name),
            bus,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Builds an event for this coordinator.
    fn event(&self, kind: EventKind) -> Event {
        Event::new(kind).with_coordinator(Arc::clone(&self.name))
    }

    pub(crate) fn publish(&self, kind: EventKind, invocation: Option<u64>) {
        let ev = self.event(kind);
        let ev = match invocation {
            Some(id) => ev.with_invocation(id),
            None => ev,
        };
        self.bus.publish(ev);
    }

    fn publish_timeout(&self, id: u64, timeout: Duration) {
        self.bus.publish(
            self.event(EventKind::TimeoutHit)
                .with_invocation(id)
                .with_timeout(timeout),
        );
    }

    fn publish_failed(&self, id: u64, reason: String) {
        self.bus.publish(
            self.event(EventKind::InvocationFailed)
                .with_invocation(id)
                .with_reason(reason),
        );
    }
}

/// Locks coordinator bookkeeping, recovering from poisoning.
///
/// The protected state is a handful of plain fields updated without
/// intermediate invariants, so a panic elsewhere cannot leave it torn.
pub(crate) fn lock<S>(m: &Mutex<S>) -> MutexGuard<'_, S> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs invocation `id` of `work`, honoring `timeout`.
///
/// Publishes `InvocationStarted` before the work is spawned. Does **not**
/// classify the result; see [`settle`].
pub(crate) async fn run_once<I, T, E>(
    work: &WorkRef<I, T, E>,
    input: I,
    token: &CancellationToken,
    timeout: Option<Duration>,
    id: u64,
    emitter: &Emitter,
) -> Completion<T, E>
where
    I: 'static,
    T: 'static,
    E: 'static,
{
    emitter.publish(EventKind::InvocationStarted, Some(id));
    let fut = work.spawn(input, CancelSignal::new(token.clone()));

    match timeout.filter(|d| *d > Duration::ZERO) {
        Some(dur) => match time::timeout(dur, fut).await {
            Ok(res) => Completion::Finished(res),
            Err(_elapsed) => Completion::TimedOut(dur),
        },
        None => Completion::Finished(fut.await),
    }
}

/// Turns a completion into the caller-visible result.
///
/// Must be called while the coordinator's bookkeeping lock is held so that
/// "was I superseded?" and "clear my slot" are observed atomically.
pub(crate) fn settle<T, E>(
    token: &CancellationToken,
    completion: Completion<T, E>,
) -> Result<Outcome<T>, InvokeError<E>> {
    if token.is_cancelled() {
        return Ok(Outcome::Cancelled);
    }
    match completion {
        Completion::Finished(Ok(v)) => Ok(Outcome::Success(v)),
        Completion::Finished(Err(e)) => Err(InvokeError::Failed(e)),
        Completion::TimedOut(timeout) => {
            token.cancel();
            Err(InvokeError::Timeout { timeout })
        }
    }
}

/// Publishes the terminal event(s) for a settled invocation.
pub(crate) fn publish_settled<T, E: Display>(
    emitter: &Emitter,
    id: u64,
    res: &Result<Outcome<T>, InvokeError<E>>,
) {
    match res {
        Ok(Outcome::Success(_)) => emitter.publish(EventKind::InvocationSucceeded, Some(id)),
        Ok(Outcome::Cancelled) => emitter.publish(EventKind::InvocationCancelled, Some(id)),
        // Suppressed invocations never reach the runner.
        Ok(Outcome::Suppressed) => {}
        Err(InvokeError::Timeout { timeout }) => {
            emitter.publish_timeout(id, *timeout);
            emitter.publish_failed(id, res_message(res));
        }
        Err(_) => emitter.publish_failed(id, res_message(res)),
    }
}

fn res_message<T, E: Display>(res: &Result<Outcome<T>, InvokeError<E>>) -> String {
    match res {
        Err(e) => e.as_message(),
        Ok(o) => o.as_label().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::work::WorkFn;

    fn sleeper() -> WorkRef<u64, u64, String> {
        WorkFn::arc("sleeper", |ms: u64, _s: CancelSignal| async move {
            time::sleep(Duration::from_millis(ms)).await;
            Ok::<_, String>(ms)
        })
    }

    #[tokio::test(start_paused = true)]
    async fn finished_work_settles_as_success() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let em = Emitter::new("t", bus);
        let token = CancellationToken::new();

        let c = run_once(&sleeper(), 10, &token, None, 1, &em).await;
        let res = settle(&token, c);
        publish_settled(&em, 1, &res);

        assert_eq!(res.unwrap(), Outcome::Success(10));
        assert_eq!(rx.recv().await.unwrap().kind, EventKind::InvocationStarted);
        assert_eq!(rx.recv().await.unwrap().kind, EventKind::InvocationSucceeded);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_cancels_token_and_reports() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let em = Emitter::new("t", bus);
        let token = CancellationToken::new();

        let c = run_once(&sleeper(), 1_000, &token, Some(Duration::from_millis(50)), 7, &em).await;
        let res = settle(&token, c);
        publish_settled(&em, 7, &res);

        assert!(matches!(res, Err(InvokeError::Timeout { timeout }) if timeout == Duration::from_millis(50)));
        assert!(token.is_cancelled());
        assert_eq!(rx.recv().await.unwrap().kind, EventKind::InvocationStarted);
        let hit = rx.recv().await.unwrap();
        assert_eq!(hit.kind, EventKind::TimeoutHit);
        assert_eq!(hit.timeout_ms, Some(50));
        assert_eq!(rx.recv().await.unwrap().kind, EventKind::InvocationFailed);
    }

    #[test]
    fn cancelled_token_discards_result() {
        let token = CancellationToken::new();
        token.cancel();
        let res = settle::<u8, String>(&token, Completion::Finished(Ok(1)));
        assert_eq!(res.unwrap(), Outcome::Cancelled);

        let res = settle::<u8, String>(&token, Completion::Finished(Err("boom".into())));
        assert_eq!(res.unwrap(), Outcome::Cancelled);

        let res = settle::<u8, String>(&token, Completion::TimedOut(Duration::from_millis(1)));
        assert_eq!(res.unwrap(), Outcome::Cancelled);
    }

    #[test]
    fn failure_is_propagated_unchanged() {
        let token = CancellationToken::new();
        let res = settle::<u8, String>(&token, Completion::Finished(Err("boom".into())));
        match res {
            Err(InvokeError::Failed(e)) => assert_eq!(e, "boom"),
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
