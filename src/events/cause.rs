//! # Classified rollback causes.
//!
//! [`RollbackCause`] is the fixed enumeration attached to a rollback report.
//! Its canonical string names are what the monitor persists in the reason
//! slot, so a cause classified before a process kill survives the kill.
//!
//! Classification is total: an absent, unrecognized, or malformed slot value
//! maps to [`RollbackCause::Unknown`] — the classifier must never be the
//! reason a rollback report is lost.

/// Why an installed update was rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RollbackCause {
    /// No reason was persisted, or the persisted value was unrecognized.
    Unknown,

    /// An uncaught error was thrown by the update's runtime code while the
    /// health-check window was open.
    JsError,

    /// An unhandled promise rejection occurred while the health-check window
    /// was open.
    JsUnhandledRejection,

    /// The native side crashed while the health-check window was open.
    NativeCrash,

    /// The process was force-closed after runtime code had started but before
    /// it reported healthy — suspected slow runtime startup.
    ForceQuitSlowRuntime,

    /// The process was force-closed before runtime code ever started —
    /// suspected slow native startup.
    ForceQuitSlowNative,
}

impl RollbackCause {
    /// Canonical persisted name of the cause.
    ///
    /// These strings are the durable wire form of the reason slot; they must
    /// stay stable across releases.
    pub fn as_str(&self) -> &'static str {
        match self {
            RollbackCause::Unknown => "UNKNOWN",
            RollbackCause::JsError => "JS_ERROR",
            RollbackCause::JsUnhandledRejection => "JS_UNHANDLED_REJECTION",
            RollbackCause::NativeCrash => "NATIVE_CRASH",
            RollbackCause::ForceQuitSlowRuntime => "FORCE_QUIT_SLOW_RUNTIME",
            RollbackCause::ForceQuitSlowNative => "FORCE_QUIT_SLOW_NATIVE",
        }
    }

    /// Maps a persisted reason-slot value back to a cause.
    ///
    /// Total: `None` and anything that is not a canonical name classify as
    /// [`RollbackCause::Unknown`].
    ///
    /// # Example
    /// ```
    /// use rollvisor::RollbackCause;
    ///
    /// assert_eq!(RollbackCause::classify(Some("NATIVE_CRASH")), RollbackCause::NativeCrash);
    /// assert_eq!(RollbackCause::classify(Some("garbage")), RollbackCause::Unknown);
    /// assert_eq!(RollbackCause::classify(None), RollbackCause::Unknown);
    /// ```
    pub fn classify(slot: Option<&str>) -> Self {
        match slot {
            Some("JS_ERROR") => RollbackCause::JsError,
            Some("JS_UNHANDLED_REJECTION") => RollbackCause::JsUnhandledRejection,
            Some("NATIVE_CRASH") => RollbackCause::NativeCrash,
            Some("FORCE_QUIT_SLOW_RUNTIME") => RollbackCause::ForceQuitSlowRuntime,
            Some("FORCE_QUIT_SLOW_NATIVE") => RollbackCause::ForceQuitSlowNative,
            _ => RollbackCause::Unknown,
        }
    }
}

impl std::fmt::Display for RollbackCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_round_trips_every_cause() {
        let all = [
            RollbackCause::Unknown,
            RollbackCause::JsError,
            RollbackCause::JsUnhandledRejection,
            RollbackCause::NativeCrash,
            RollbackCause::ForceQuitSlowRuntime,
            RollbackCause::ForceQuitSlowNative,
        ];
        for cause in all {
            assert_eq!(RollbackCause::classify(Some(cause.as_str())), cause);
        }
    }

    #[test]
    fn test_classify_is_total() {
        assert_eq!(RollbackCause::classify(None), RollbackCause::Unknown);
        assert_eq!(RollbackCause::classify(Some("")), RollbackCause::Unknown);
        assert_eq!(
            RollbackCause::classify(Some("js_error")),
            RollbackCause::Unknown,
            "matching is case-sensitive on the canonical names"
        );
        assert_eq!(
            RollbackCause::classify(Some("{\"not\": \"a name\"}")),
            RollbackCause::Unknown
        );
    }
}
