//! # Rollback reporter trait.
//!
//! Provides [`Report`], the extension point through which the host ships a
//! finished rollback report (formatted evidence lines + classified cause) to
//! wherever it keeps such things — an analytics pipeline, a crash tracker,
//! a log file.
//!
//! Each delivery runs:
//! - **Outside the caller's context** (a spawned task, never the lifecycle
//!   thread that observed the rollback);
//! - **After** the monitor has already cleared its persisted state;
//! - **At most once**: no retry, no timeout, no return channel. A panic
//!   inside the reporter is caught and routed to [`ReportFault`] instead of
//!   unwinding the worker.
//!
//! [`ReportFault`]: crate::ReportFault
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use rollvisor::{Report, RollbackCause};
//!
//! struct Analytics;
//!
//! #[async_trait]
//! impl Report for Analytics {
//!     async fn report(&self, events: &[String], cause: RollbackCause) {
//!         // ship `events` and `cause.as_str()` to your backend
//!         let _ = (events, cause);
//!     }
//!
//!     fn name(&self) -> &'static str { "analytics" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::RollbackCause;

/// Receiver of finished rollback reports.
///
/// ### Implementation requirements
/// - Use async I/O; the delivery task is the only thing this future blocks.
/// - Handle errors internally; a failed delivery is a lost report by design.
/// - Do not assume the monitor still holds the reported state — it was
///   cleared before dispatch.
#[async_trait]
pub trait Report: Send + Sync + 'static {
    /// Delivers one report: chronological formatted evidence lines plus the
    /// classified cause.
    async fn report(&self, events: &[String], cause: RollbackCause);

    /// Returns the reporter name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose —
    /// override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
