//! # Durable journal: event log blob + reason slot.
//!
//! [`Journal`] owns the two durable keys of the monitor and the rules for
//! reading them back:
//!
//! - the **event log** key holds the whole trail as one JSON array; every
//!   append re-serializes and rewrites the array, so a successful write is a
//!   consistent snapshot of the trail;
//! - the **reason slot** key holds the plain canonical cause string; crash
//!   paths write it with synchronous durability so the classification made
//!   before a kill survives the kill.
//!
//! ## Read-side tolerance
//! Absent, unreadable, or corrupt persisted data never raises past this
//! module: [`Journal::load_events`] returns an empty trail and
//! [`Journal::read_reason`] returns `None`, each logging what it skipped at
//! debug granularity. A subsystem that exists to record why the app failed
//! must not itself fail on a half-written blob.

use std::sync::Arc;

use tracing::debug;

use crate::error::MonitorError;
use crate::events::{Event, RollbackCause};

use super::Store;

/// Persistence layer for the evidence trail and the suspected cause.
pub struct Journal {
    store: Arc<dyn Store>,
    events_key: String,
    reason_key: String,
}

impl Journal {
    /// Creates a journal over `store` using the two given durable keys.
    pub fn new(store: Arc<dyn Store>, events_key: impl Into<String>, reason_key: impl Into<String>) -> Self {
        Self {
            store,
            events_key: events_key.into(),
            reason_key: reason_key.into(),
        }
    }

    /// Loads the persisted trail, treating any failure as "no prior state".
    pub fn load_events(&self) -> Vec<Event> {
        let raw = match self.store.get(&self.events_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                debug!(error = %e, "journal: event log unreadable, starting empty");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<Event>>(&raw) {
            Ok(events) => events,
            Err(e) => {
                debug!(error = %e, "journal: event log corrupt, starting empty");
                Vec::new()
            }
        }
    }

    /// Persists the whole trail as one JSON array (eventual durability).
    pub fn save_events(&self, events: &[Event]) -> Result<(), MonitorError> {
        let blob = serde_json::to_string(events)?;
        self.store.set(&self.events_key, &blob)?;
        Ok(())
    }

    /// Durably writes the canonical cause string into the reason slot.
    ///
    /// Called on crash paths; the commit must survive an immediate process
    /// kill, so this uses the store's synchronous variant.
    pub fn write_reason(&self, cause: RollbackCause) -> Result<(), MonitorError> {
        self.store.set_durable(&self.reason_key, cause.as_str())?;
        Ok(())
    }

    /// Reads the raw reason slot; read failures collapse to `None`.
    pub fn read_reason(&self) -> Option<String> {
        match self.store.get(&self.reason_key) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "journal: reason slot unreadable, treating as absent");
                None
            }
        }
    }

    /// Removes the event log and the reason slot in one commit.
    pub fn clear(&self) -> Result<(), MonitorError> {
        self.store
            .remove_batch(&[&self.events_key, &self.reason_key])?;
        Ok(())
    }
}
