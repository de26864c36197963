//! # Report collaborators of the rollback monitor.
//!
//! This module provides the two seams through which triage results leave the
//! crate, plus a built-in demo implementation.
//!
//! ## Architecture
//! ```text
//! Report flow:
//!   RollbackMonitor::on_rollback()
//!       ├─► snapshot trail + classify cause
//!       ├─► clear persisted/in-memory state   (synchronous, before return)
//!       └─► tokio::spawn ──► format lines ──► Report::report(&lines, cause)
//!                                 │
//!                                 └─ panic caught ──► ReportFault::fault()
//!
//! Fault flow (any shielded operation):
//!   storage / serialization / panic ──► ReportFault::fault(op, &error)
//! ```
//!
//! ## Collaborator types
//! - [`Report`] — async, at-most-once receiver of finished rollback reports
//! - [`ReportFault`] — sync receiver of shield-intercepted internal failures
//! - [`LogReporter`] — stdout demo reporter (feature `logging`)

mod fault;
#[cfg(feature = "logging")]
mod log;
mod reporter;

pub use fault::ReportFault;
#[cfg(feature = "logging")]
pub use log::LogReporter;
pub use reporter::Report;
