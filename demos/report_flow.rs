//! # Demo: report_flow
//!
//! Walks one full unhealthy-update lifecycle and prints the resulting
//! rollback report with the built-in [`LogReporter`].
//!
//! Shows how to:
//! - Construct a [`RollbackMonitor`] over a [`Store`] implementation.
//! - Wire the [`Report`] collaborator.
//! - Drive the health-check window through an exception into a rollback.
//!
//! ## Flow
//! ```text
//! begin_waiting_for_ready()            (window opens)
//!     ├─► log("JS started")            (runtime marker)
//!     ├─► on_js_error(...)             (reason slot = JS_ERROR, durable)
//!     └─► on_rollback()
//!           ├─► snapshot + classify
//!           ├─► clear state (synchronous)
//!           └─► LogReporter prints the report (spawned task)
//! ```
//!
//! ## Run
//! Requires the `logging` feature to export [`LogReporter`].
//! ```bash
//! cargo run --example report_flow --features logging
//! ```

use std::sync::Arc;

use rollvisor::{LogReporter, MemoryStore, MonitorConfig, RollbackMonitor};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // The host would pass its real crash-safe KV engine here.
    let monitor = RollbackMonitor::new(Arc::new(MemoryStore::new()), MonitorConfig::default());
    monitor.set_reporter(Arc::new(LogReporter));

    // A freshly installed bundle starts executing.
    monitor.log("App started");
    monitor.begin_waiting_for_ready();
    monitor.log("JS started");

    // It blows up before confirming health.
    monitor.on_js_error("TypeError: undefined is not a function\n  at render (bundle.js:4821)");

    // The update manager decides to roll back.
    let cause = monitor.on_rollback();
    println!("classified cause: {:?}", cause);

    // Give the spawned delivery task a chance to print before exit.
    tokio::task::yield_now().await;
}
