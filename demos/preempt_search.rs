//! # Example: preempt_search
//!
//! Search-as-you-type with a [`PreemptCoordinator`].
//!
//! Shows how to:
//! - Write a unit of work that honours its [`CancelSignal`]
//! - Fire several invocations in quick succession
//! - Tell superseded calls (`Cancelled`) apart from real answers
//!
//! ## Flow
//! ```text
//! keystroke "r"    ─► invoke("r")    ─┐ cancelled by "ru"
//! keystroke "ru"   ─► invoke("ru")   ─┤ cancelled by "rus"
//! keystroke "rus"  ─► invoke("rus")  ─┤ cancelled by "rust"
//! keystroke "rust" ─► invoke("rust") ─┴► Success(results)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example preempt_search
//! ```

use std::{sync::Arc, time::Duration};

use callvisor::{CancelSignal, Config, InvokeError, Outcome, PreemptCoordinator, WorkFn, WorkRef};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    println!("=== preempt_search example ===\n");

    // 1. The unit of work: a fake backend that takes 80ms per query.
    let backend: WorkRef<String, Vec<String>, std::io::Error> =
        WorkFn::arc("backend", |query: String, signal: CancelSignal| async move {
            tokio::select! {
                _ = signal.cancelled() => {
                    println!("[backend] {query:?} abandoned");
                    Ok(Vec::new())
                }
                _ = tokio::time::sleep(Duration::from_millis(80)) => {
                    Ok(vec![format!("{query}-lang"), format!("{query}acean")])
                }
            }
        });

    // 2. Wrap it.
    let search = Arc::new(
        PreemptCoordinator::builder(backend)
            .with_config(Config {
                timeout: Duration::from_secs(2),
                ..Config::named("search")
            })
            .build(),
    );

    // 3. Simulate typing: one keystroke every 20ms.
    let mut calls = Vec::new();
    for prefix in ["r", "ru", "rus", "rust"] {
        let search = Arc::clone(&search);
        let query = prefix.to_string();
        calls.push(tokio::spawn(async move {
            let res = search.invoke(query.clone()).await;
            (query, res)
        }));
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    // 4. Only the last keystroke produces results.
    for call in calls {
        let (query, res) = call.await?;
        match res {
            Ok(Outcome::Success(hits)) => println!("[ui] {query:?} → {hits:?}"),
            Ok(other) => println!("[ui] {query:?} → {}", other.as_label()),
            Err(InvokeError::Failed(e)) => println!("[ui] {query:?} failed: {e}"),
            Err(e) => println!("[ui] {query:?} {}", e.as_label()),
        }
    }

    println!("\n=== done ===");
    Ok(())
}
