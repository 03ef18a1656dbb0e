//! # Example: custom_subscriber
//!
//! Demonstrates how to build and attach a custom event subscriber.
//!
//! Shows how to:
//! - Implement the [`Subscribe`] trait.
//! - Inspect [`Event`] / [`EventKind`] to count outcomes per coordinator.
//! - Share one [`Monitor`] between a preempt coordinator and a gate.
//!
//! ## Run
//! ```bash
//! cargo run --example custom_subscriber
//! ```

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use callvisor::{
    CancelSignal, Config, Event, EventKind, GateCoordinator, Monitor, PreemptCoordinator,
    Subscribe, WorkFn,
};

/// Counts terminal outcomes per coordinator.
#[derive(Default)]
struct Tally {
    counts: Mutex<BTreeMap<(String, &'static str), u32>>,
}

#[async_trait::async_trait]
impl Subscribe for Tally {
    async fn on_event(&self, ev: &Event) {
        let label = match ev.kind {
            EventKind::InvocationSucceeded => "succeeded",
            EventKind::InvocationCancelled => "cancelled",
            EventKind::InvocationSuppressed => "suppressed",
            EventKind::InvocationFailed => "failed",
            _ => return,
        };
        let who = ev.coordinator.as_deref().unwrap_or("<unknown>").to_string();
        if let Ok(mut counts) = self.counts.lock() {
            *counts.entry((who, label)).or_default() += 1;
        }
    }

    fn name(&self) -> &'static str {
        "tally"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let tally = Arc::new(Tally::default());
    let subs: Vec<Arc<dyn Subscribe>> = vec![tally.clone()];
    let monitor = Monitor::builder().with_subscribers(subs).build();

    let slow = |ms: u64, signal: CancelSignal| async move {
        tokio::select! {
            _ = signal.cancelled() => Ok(0),
            _ = tokio::time::sleep(Duration::from_millis(ms)) => Ok::<_, std::io::Error>(ms),
        }
    };

    let preempt = PreemptCoordinator::builder(WorkFn::arc("slow", slow))
        .with_config(Config::named("refresh"))
        .with_bus(monitor.bus())
        .build();
    let gate = GateCoordinator::builder(WorkFn::arc("slow", slow))
        .with_config(Config::named("save"))
        .with_bus(monitor.bus())
        .build();

    // Two overlapping refreshes: the first is cancelled.
    let (a, b) = tokio::join!(preempt.invoke(60), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        preempt.invoke(10).await
    });
    println!("refresh: {:?} / {:?}", a?, b?);

    // Two overlapping saves: the second is suppressed.
    let (c, d) = tokio::join!(gate.invoke(30), async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        gate.invoke(30).await
    });
    println!("save:    {:?} / {:?}", c?, d?);

    monitor.shutdown().await;

    if let Ok(counts) = tally.counts.lock() {
        for ((who, label), n) in counts.iter() {
            println!("{who:>8} {label:<10} {n}");
        }
    }
    Ok(())
}
