//! # rollvisor
//!
//! **Rollvisor** is a crash-safe rollback-triage library for over-the-air
//! update clients.
//!
//! After a new code bundle is installed, the host app must signal "I am
//! alive and healthy" within some window. If it does not — or fails in
//! specific observable ways — rollvisor classifies *why*, preserves a
//! timestamped evidence trail across process kills, and hands both to an
//! external reporter once the update manager declares a rollback.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  host lifecycle layer (out of scope)        rollvisor
//!  ┌───────────────────────────────┐
//!  │ process-start hook            │──► install(RollbackMonitor::new(store, cfg))
//!  │ runtime bridge log(text, mls) │──► log_at()
//!  │ update manager                │──► begin_waiting_for_ready() / notify_ready()
//!  │ uncaught-exception hooks      │──► on_js_error() / on_js_unhandled_rejection()
//!  │                               │──► on_native_crash()
//!  │ task-removal hook             │──► on_force_close()
//!  │ update manager                │──► on_rollback()
//!  └───────────────────────────────┘         │
//!                                            ▼
//!                      ┌───────────────────────────────────────┐
//!                      │ RollbackMonitor                       │
//!                      │  - Mutex<LifecycleState> (3 flags +   │
//!                      │    in-memory event trail)             │
//!                      │  - Journal (2 durable keys)           │
//!                      │  - failure shield on every entry point│
//!                      └──────┬───────────────────┬────────────┘
//!                             ▼                   ▼
//!                    trait Store            on_rollback():
//!                 (host KV engine,       snapshot ─► classify ─►
//!                  crash-safe commit)    clear (sync) ─► tokio::spawn
//!                                                           │
//!                                            Report::report(lines, cause)
//!                                            ReportFault::fault(op, err)
//! ```
//!
//! ### Durability model
//! ```text
//! survives a process kill:            reconstructed false on every start:
//!   - event trail (JSON array blob)     - runtime_started
//!   - reason slot (cause string)        - waiting_for_ready
//!                                       - exception_while_waiting
//!
//! the reason slot is the ONLY cross-restart carrier of "what went wrong";
//! crash-path writes use the store's synchronous-commit variant so a kill
//! immediately after the hook returns cannot lose the classification.
//! ```
//!
//! ## Features
//! | Area            | Description                                                   | Key types / traits            |
//! |-----------------|---------------------------------------------------------------|-------------------------------|
//! | **Monitor**     | Lifecycle state machine, health-check window, classification. | [`RollbackMonitor`]           |
//! | **Persistence** | Host storage seam + durable journal + in-memory test store.   | [`Store`], [`MemoryStore`]    |
//! | **Evidence**    | Timestamped trail events and the classified cause set.        | [`Event`], [`RollbackCause`]  |
//! | **Reporting**   | Async at-most-once report delivery; internal-fault channel.   | [`Report`], [`ReportFault`]   |
//! | **Errors**      | Typed errors for storage and shielded internals.              | [`MonitorError`], [`StoreError`] |
//! | **Configuration** | Durable key names and the runtime-started marker.           | [`MonitorConfig`]             |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogReporter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use rollvisor::{MemoryStore, MonitorConfig, Report, RollbackCause, RollbackMonitor};
//!
//! struct Printer;
//!
//! #[async_trait]
//! impl Report for Printer {
//!     async fn report(&self, events: &[String], cause: RollbackCause) {
//!         println!("rolled back: {cause}");
//!         for line in events {
//!             println!("  {line}");
//!         }
//!     }
//!     fn name(&self) -> &'static str { "printer" }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     // The host normally passes its real crash-safe KV engine here.
//!     let monitor = RollbackMonitor::new(Arc::new(MemoryStore::new()), MonitorConfig::default());
//!     monitor.set_reporter(Arc::new(Printer));
//!
//!     // A new bundle starts executing and must prove itself:
//!     monitor.begin_waiting_for_ready();
//!     monitor.log("JS started");
//!
//!     // ...it never calls notify_ready(); the update manager rolls back:
//!     let cause = monitor.on_rollback();
//!     assert_eq!(cause, Some(RollbackCause::Unknown));
//! }
//! ```

mod core;
mod error;
mod events;
mod reporters;
mod store;

// ---- Public re-exports ----

pub use crate::core::{global, install, MonitorConfig, RollbackMonitor};
pub use error::{MonitorError, StoreError};
pub use events::{Event, RollbackCause};
pub use reporters::{Report, ReportFault};
pub use store::{Journal, MemoryStore, Store};

// Optional: expose a simple built-in stdout reporter (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use reporters::LogReporter;
