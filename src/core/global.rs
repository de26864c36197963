//! # Process-scoped monitor installation.
//!
//! A host process has exactly one rollback monitor: the lifecycle hooks that
//! feed it (process-start, bridge log, task-removal, uncaught-exception,
//! rollback) are themselves process-global and must all hit the same state.
//!
//! [`install`] stores the monitor once for the process lifetime and returns
//! the shared handle; calling it a second time is a programming error in the
//! host integration and fails fast with
//! [`MonitorError::AlreadyInitialized`]. [`global`] hands the installed
//! monitor to hooks that cannot carry the handle themselves.
//!
//! Hosts that can thread an `Arc<RollbackMonitor>` through their entry
//! points explicitly are free to skip this module entirely and use
//! [`RollbackMonitor::new`].

use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::error::MonitorError;

use super::machine::RollbackMonitor;

static GLOBAL: OnceLock<Arc<RollbackMonitor>> = OnceLock::new();

/// Installs `monitor` as the process-scoped instance, exactly once.
///
/// # Errors
/// Returns [`MonitorError::AlreadyInitialized`] if a monitor was already
/// installed in this process.
pub fn install(monitor: RollbackMonitor) -> Result<Arc<RollbackMonitor>, MonitorError> {
    let monitor = Arc::new(monitor);
    GLOBAL
        .set(Arc::clone(&monitor))
        .map_err(|_| MonitorError::AlreadyInitialized)?;
    debug!("monitor: installed process-scoped instance");
    Ok(monitor)
}

/// Returns the installed process-scoped monitor, if any.
#[must_use]
pub fn global() -> Option<Arc<RollbackMonitor>> {
    GLOBAL.get().cloned()
}
