//! # Monitor configuration.
//!
//! Provides [`MonitorConfig`], the centralized settings for the rollback
//! monitor: the two durable key names and the marker string that flips the
//! `runtime_started` flag.
//!
//! Config is consumed once, at monitor construction:
//! `RollbackMonitor::new(store, config)`.

/// Configuration for the rollback monitor.
///
/// ## Field semantics
/// - `events_key`: durable key under which the serialized event trail lives
/// - `reason_key`: durable key holding the suspected-cause string
/// - `runtime_started_marker`: substring that, when contained in a logged
///   event text, marks the update's runtime code as started
///
/// ## Notes
/// The defaults are fine for a fresh integration. Hosts migrating an
/// existing store must keep their historical key names, or trails persisted
/// by earlier app versions become invisible to the monitor.
#[derive(Clone, Debug)]
pub struct MonitorConfig {
    /// Durable key for the serialized event trail (JSON array).
    pub events_key: String,

    /// Durable key for the suspected rollback cause (plain string).
    ///
    /// Removed together with `events_key` on every clear; the two keys are
    /// never live independently.
    pub reason_key: String,

    /// Marker substring that flips the in-memory `runtime_started` flag.
    ///
    /// Matched with `contains`, so variants like `"JS started (background)"`
    /// still count as a runtime start.
    pub runtime_started_marker: String,
}

impl Default for MonitorConfig {
    /// Returns a config with:
    /// - `events_key = "rollvisor.events"`;
    /// - `reason_key = "rollvisor.reason"`;
    /// - `runtime_started_marker = "JS started"`.
    fn default() -> Self {
        Self {
            events_key: "rollvisor.events".to_string(),
            reason_key: "rollvisor.reason".to_string(),
            runtime_started_marker: "JS started".to_string(),
        }
    }
}
