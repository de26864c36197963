//! Monitor core: the state machine and its process-scoped wiring.
//!
//! This module contains the decision-making half of rollvisor. The public
//! API from here is [`RollbackMonitor`] plus the process-scoped
//! [`install`]/[`global`] pair and [`MonitorConfig`].
//!
//! Internal modules:
//! - [`machine`]: lifecycle transitions, failure shield, report dispatch;
//! - [`config`]: durable key names and the runtime-started marker;
//! - [`global`]: once-only process-scoped installation.

mod config;
mod global;
mod machine;

pub use config::MonitorConfig;
pub use global::{global, install};
pub use machine::RollbackMonitor;
