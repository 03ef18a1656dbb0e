//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [started] coordinator="search" invocation=Some(1)
//! [preempted] coordinator="search" invocation=Some(1)
//! [cancelled] coordinator="search" invocation=Some(1)
//! [succeeded] coordinator="search" invocation=Some(2)
//! [suppressed] coordinator="submit"
//! [released] coordinator="submit" invocation=Some(4)
//! [timeout] coordinator="search" invocation=Some(3) timeout_ms=Some(500)
//! ```

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;
use async_trait::async_trait;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn unknown(s: Option<&str>) -> &str {
    s.unwrap_or("unknown")
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let who = unknown(e.coordinator.as_deref());
        match e.kind {
            EventKind::InvocationStarted => {
                println!("[started] coordinator={who:?} invocation={:?}", e.invocation);
            }
            EventKind::InvocationPreempted => {
                println!("[preempted] coordinator={who:?} invocation={:?}", e.invocation);
            }
            EventKind::InvocationCancelled => {
                println!("[cancelled] coordinator={who:?} invocation={:?}", e.invocation);
            }
            EventKind::InvocationSucceeded => {
                println!("[succeeded] coordinator={who:?} invocation={:?}", e.invocation);
            }
            EventKind::InvocationFailed => {
                println!(
                    "[failed] coordinator={who:?} invocation={:?} err={:?}",
                    e.invocation, e.reason
                );
            }
            EventKind::InvocationSuppressed => {
                println!("[suppressed] coordinator={who:?}");
            }
            EventKind::TimeoutHit => {
                println!(
                    "[timeout] coordinator={who:?} invocation={:?} timeout_ms={:?}",
                    e.invocation, e.timeout_ms
                );
            }
            EventKind::GateReleased => {
                println!("[released] coordinator={who:?} invocation={:?}", e.invocation);
            }
            EventKind::SubscriberOverflow => {
                println!("[subscriber-overflow] subscriber={who} reason={:?}", e.reason);
            }
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panicked] subscriber={who} info={}",
                    unknown(e.reason.as_deref()),
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
