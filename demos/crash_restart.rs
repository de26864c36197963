//! # Demo: crash_restart
//!
//! Simulates a process kill between a classified crash and the rollback
//! decision: two monitor instances over the *same* store stand in for two
//! process lifetimes.
//!
//! Shows how to:
//! - Persist evidence across a simulated process death.
//! - Implement a custom [`Report`] collaborator.
//! - Observe that lifecycle flags reset while the reason slot survives.
//!
//! ## Run
//! ```bash
//! cargo run --example crash_restart
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use rollvisor::{MemoryStore, MonitorConfig, Report, RollbackCause, RollbackMonitor};

/// Stand-in for the host's real delivery path (analytics, crash tracker...).
struct ConsoleReporter;

#[async_trait]
impl Report for ConsoleReporter {
    async fn report(&self, events: &[String], cause: RollbackCause) {
        println!("== rollback report ==");
        println!("cause: {cause}");
        for line in events {
            println!("  {line}");
        }
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let store = Arc::new(MemoryStore::new());

    // --- process lifetime #1: the update crashes natively ---
    {
        let monitor =
            RollbackMonitor::new(store.clone(), MonitorConfig::default());
        monitor.log("App started");
        monitor.begin_waiting_for_ready();
        monitor.on_native_crash("SIGSEGV in libimagepipeline.so");
        // ...process is killed here; nothing else runs.
    }

    // --- process lifetime #2: app relaunches, update manager rolls back ---
    let monitor = RollbackMonitor::new(store, MonitorConfig::default());
    monitor.set_reporter(Arc::new(ConsoleReporter));
    monitor.log("App started");

    let cause = monitor.on_rollback();
    assert_eq!(cause, Some(RollbackCause::NativeCrash));

    tokio::task::yield_now().await;
}
