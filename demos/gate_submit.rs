//! # Example: gate_submit
//!
//! Double-submit protection with a [`GateCoordinator`] and manual release.
//!
//! Shows how to:
//! - Build a gate with [`ReleasePolicy::Manual`]
//! - Keep the gate closed past the request until a follow-up step finishes
//! - Watch lifecycle events through a [`Monitor`] and the built-in `LogWriter`
//!
//! ## Flow
//! ```text
//! click #1 ─► invoke ─► POST ─► Success ─┐
//! click #2 ─► invoke ─► Suppressed       │ gate still closed
//!                                        ├─► follow-up (redirect) ─► release()
//! click #3 ─► invoke ─► POST ─► Success ◄┘
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example gate_submit --features logging
//! ```

use std::{sync::Arc, time::Duration};

use callvisor::{
    CancelSignal, Config, GateCoordinator, LogWriter, Monitor, ReleasePolicy, Subscribe, WorkFn,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== gate_submit example ===\n");

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let monitor = Monitor::builder().with_subscribers(subs).build();

    let submit = GateCoordinator::builder(WorkFn::arc(
        "post-form",
        |form: &'static str, _signal: CancelSignal| async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, std::io::Error>(format!("saved {form}"))
        },
    ))
    .with_config(Config::named("submit"))
    .with_bus(monitor.bus())
    .with_release(ReleasePolicy::Manual)
    .build();

    let first = submit.invoke("order#1").await?;
    println!("[ui] click #1 → {first:?}");

    let second = submit.invoke("order#1").await?;
    println!("[ui] click #2 → {second:?}");

    // Follow-up step still owns the busy window.
    tokio::time::sleep(Duration::from_millis(30)).await;
    submit.release();

    let third = submit.invoke("order#2").await?;
    println!("[ui] click #3 → {third:?}");

    monitor.shutdown().await;
    println!("\n=== done ===");
    Ok(())
}
