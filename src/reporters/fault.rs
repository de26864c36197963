//! # Internal-fault reporter trait.
//!
//! Provides [`ReportFault`], the collaborator that receives failures the
//! monitor's shield intercepted: storage faults, serialization faults,
//! panics inside an operation or inside the rollback reporter.
//!
//! Unlike [`Report`](crate::Report) this trait is synchronous: it is invoked
//! from whatever thread hit the fault, which on crash paths is an exception
//! handler that must finish quickly. Implementations should hand the error
//! off (queue it, count it) rather than do I/O inline.

use crate::error::MonitorError;

/// Receiver of shield-intercepted internal failures.
///
/// ### Implementation requirements
/// - Return quickly; may be called from crash-handling threads.
/// - Never panic: a fault reporter that fails is simply skipped, there is no
///   second-level shield around it by design.
pub trait ReportFault: Send + Sync + 'static {
    /// Reports one intercepted failure.
    ///
    /// `op` names the monitor operation that failed (e.g. `"on_rollback"`).
    fn fault(&self, op: &'static str, error: &MonitorError);

    /// Returns the reporter name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
