//! # Simple logging reporter for debugging and demos.
//!
//! [`LogReporter`] prints rollback reports to stdout in a human-readable
//! format. This is primarily useful for development, debugging, and the
//! runnable demos.
//!
//! ## Output format
//! ```text
//! [rollback] cause=JS_ERROR events=3
//!   30/Aug/2026 10:12:01.000 UTC: App started
//!   30/Aug/2026 10:12:01.120 UTC: JS started
//!   30/Aug/2026 10:12:02.480 UTC: rollback
//! ```
//!
//! ## Example
//! ```no_run
//! # use std::sync::Arc;
//! # use rollvisor::{LogReporter, MemoryStore, MonitorConfig, RollbackMonitor};
//! let monitor = RollbackMonitor::new(Arc::new(MemoryStore::new()), MonitorConfig::default());
//! monitor.set_reporter(Arc::new(LogReporter));
//! ```

use async_trait::async_trait;

use crate::events::RollbackCause;

use super::Report;

/// Simple stdout reporter.
///
/// Enabled via the `logging` feature. Prints each report's cause and
/// evidence lines for debugging and demonstration purposes.
///
/// Not intended for production use — implement a custom [`Report`] for real
/// delivery.
pub struct LogReporter;

#[async_trait]
impl Report for LogReporter {
    async fn report(&self, events: &[String], cause: RollbackCause) {
        println!("[rollback] cause={} events={}", cause, events.len());
        for line in events {
            println!("  {line}");
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
