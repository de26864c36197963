//! # Timestamped trail events recorded by the rollback monitor.
//!
//! [`Event`] is the unit of evidence: one free-form text line plus the epoch
//! millis at which it was captured. Events are immutable once created, kept
//! in insertion (chronological) order, and persisted as a single JSON array
//! so the trail survives a process kill.
//!
//! ## Persisted form
//! ```text
//! [{"text": "App started", "timestampMillis": 1724990000000}, ...]
//! ```
//!
//! ## Example
//! ```rust
//! use rollvisor::Event;
//!
//! let ev = Event::at("JS started", 1_724_990_000_000);
//! assert_eq!(ev.text, "JS started");
//! assert!(ev.format_line().ends_with(": JS started"));
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One timestamped entry of the rollback evidence trail.
///
/// - `text`: free-form description of what happened
/// - `timestamp_millis`: wall-clock capture time, epoch millis
///
/// The serde field names match the durable layout (`text` / `timestampMillis`);
/// changing them breaks trails persisted by earlier process lifetimes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Human-readable description of the signal.
    pub text: String,
    /// Wall-clock capture time in milliseconds since the Unix epoch.
    #[serde(rename = "timestampMillis")]
    pub timestamp_millis: i64,
}

impl Event {
    /// Creates an event stamped with the current wall-clock time.
    pub fn now(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp_millis: now_millis(),
        }
    }

    /// Creates an event with a caller-supplied capture time.
    ///
    /// Used by bridge entry points where the signal was captured earlier than
    /// it is being recorded (e.g. the runtime notes its own start time and
    /// hands it across the bridge later).
    pub fn at(text: impl Into<String>, timestamp_millis: i64) -> Self {
        Self {
            text: text.into(),
            timestamp_millis,
        }
    }

    /// Renders the event as one report line: `<timestamp>: <text>`.
    ///
    /// The timestamp is formatted as `dd/Mon/yyyy HH:MM:SS.mmm UTC`; a
    /// timestamp outside chrono's representable range falls back to the raw
    /// millis value so a bogus clock can never lose the line.
    pub fn format_line(&self) -> String {
        let stamp = Utc
            .timestamp_millis_opt(self.timestamp_millis)
            .single()
            .map(|dt| dt.format("%d/%b/%Y %H:%M:%S%.3f UTC").to_string())
            .unwrap_or_else(|| self.timestamp_millis.to_string());
        format!("{}: {}", stamp, self.text)
    }
}

/// Current wall-clock time in epoch millis.
///
/// A clock before the epoch collapses to 0 rather than panicking.
fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis().min(i64::MAX as u128) as i64)
        .unwrap_or(0)
}
