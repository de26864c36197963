//! # RollbackMonitor: the rollback-decision state machine.
//!
//! The [`RollbackMonitor`] owns the durable [`Journal`], the in-memory
//! lifecycle flags, and the report collaborators. It turns lifecycle signals
//! arriving in any order — and possibly across process restarts — into a
//! classified rollback cause plus a timestamped evidence trail.
//!
//! ## Key responsibilities
//! - append every loggable signal to the durable event trail
//! - track the health-check window (`waiting_for_ready`) and classify
//!   failures observed inside it
//! - on the terminal rollback signal: snapshot, classify, **clear
//!   synchronously**, then dispatch the report fire-and-forget
//! - shield every entry point so no internal failure ever propagates into
//!   the host's crash-handling paths
//!
//! ## Signal flow
//! ```text
//! host lifecycle layer                     RollbackMonitor
//!   process start ──────────────► new(store, config)   (journal reload, flags false)
//!   bridge log(text, mls) ──────► log_at()        ─► trail append (+ runtime_started?)
//!   update manager ─────────────► begin_waiting_for_ready()
//!   host app healthy ───────────► notify_ready()  ─► clear (terminal, non-reporting)
//!   uncaught JS error ──────────► on_js_error() ──┐
//!   unhandled rejection ────────► on_js_unhandled_rejection() ├─► reason slot (durable)
//!   uncaught native crash ──────► on_native_crash() ──────────┘
//!   task removed ───────────────► on_force_close()  ─► suspected slow-start reason
//!   update manager ─────────────► on_rollback()
//!                                    ├─► snapshot + classify
//!                                    ├─► clear (synchronous, before return)
//!                                    └─► tokio::spawn ─► Report::report(lines, cause)
//! ```
//!
//! ## Why flags are not persisted
//! Only the *consequence* of the flags — the reason slot — crosses a process
//! restart. A fresh process reconstructs all three flags as `false` and
//! reloads nothing but the event trail; an ambiguous force-close that raced
//! persistence therefore degrades to `UNKNOWN` instead of resurrecting stale
//! window state.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use futures::FutureExt;
use tracing::{debug, error, warn};

use crate::error::MonitorError;
use crate::events::{Event, RollbackCause};
use crate::reporters::{Report, ReportFault};
use crate::store::{Journal, Store};

use super::config::MonitorConfig;

/// In-memory lifecycle flags plus the working copy of the event trail.
///
/// Meaningful only while `waiting_for_ready` is true; all fields reset
/// together on every clear. Never persisted.
#[derive(Default)]
struct LifecycleState {
    events: Vec<Event>,
    runtime_started: bool,
    waiting_for_ready: bool,
    exception_while_waiting: bool,
}

/// Rollback-decision state machine with a durable evidence trail.
///
/// Entry points are designed for effectively single-writer access but are
/// serialized internally, since hosts invoke them from racing threads (an
/// exception-handler thread vs the UI thread). No public operation panics or
/// returns an error: internal failures are shielded, logged, and forwarded
/// to the optional [`ReportFault`] collaborator.
pub struct RollbackMonitor {
    journal: Journal,
    state: Mutex<LifecycleState>,
    reporter: OnceLock<Arc<dyn Report>>,
    fault_reporter: OnceLock<Arc<dyn ReportFault>>,
    config: MonitorConfig,
}

impl RollbackMonitor {
    /// Constructs a monitor over the host's persistent store.
    ///
    /// Reloads the persisted event trail (corrupt or absent data starts
    /// empty); the lifecycle flags always start `false` — the reason slot is
    /// the only cross-restart carrier of "what kind of bad thing happened".
    ///
    /// For the process-scoped singleton hosts normally want, see
    /// [`install`](crate::install).
    pub fn new(store: Arc<dyn Store>, config: MonitorConfig) -> Self {
        let journal = Journal::new(
            store,
            config.events_key.clone(),
            config.reason_key.clone(),
        );
        let events = journal.load_events();
        debug!(restored = events.len(), "monitor: constructed");
        Self {
            journal,
            state: Mutex::new(LifecycleState {
                events,
                ..LifecycleState::default()
            }),
            reporter: OnceLock::new(),
            fault_reporter: OnceLock::new(),
            config,
        }
    }

    /// Registers the rollback reporter. Effective at most once; a second
    /// registration is logged and ignored.
    pub fn set_reporter(&self, reporter: Arc<dyn Report>) {
        if self.reporter.set(reporter).is_err() {
            warn!("monitor: rollback reporter already registered, ignoring");
        }
    }

    /// Registers the internal-fault reporter. Effective at most once; a
    /// second registration is logged and ignored.
    pub fn set_fault_reporter(&self, reporter: Arc<dyn ReportFault>) {
        if self.fault_reporter.set(reporter).is_err() {
            warn!("monitor: fault reporter already registered, ignoring");
        }
    }

    /// Appends a trail event stamped with the current wall-clock time.
    pub fn log(&self, text: impl Into<String>) {
        self.log_event(Event::now(text));
    }

    /// Appends a trail event with a caller-supplied capture time.
    ///
    /// This is the runtime-bridge entry point: the update's runtime code
    /// notes its own start instant and hands it across the bridge later.
    pub fn log_at(&self, text: impl Into<String>, timestamp_millis: i64) {
        self.log_event(Event::at(text, timestamp_millis));
    }

    /// Appends one event to the trail and persists the updated trail.
    ///
    /// If the event text contains the configured runtime-started marker
    /// (default `"JS started"`), the `runtime_started` flag is set; a later
    /// force-close is then classified as a slow *runtime* start rather than
    /// a slow *native* start.
    pub fn log_event(&self, event: Event) {
        self.shielded("log", || {
            let mut st = self.lock_state();
            self.append_locked(&mut st, event)
        });
    }

    /// Opens the health-check window: the newly installed update's code just
    /// started executing and must prove itself.
    pub fn begin_waiting_for_ready(&self) {
        self.shielded("begin_waiting_for_ready", || {
            let mut st = self.lock_state();
            st.waiting_for_ready = true;
            self.append_locked(
                &mut st,
                Event::now("waiting for notify-ready: update bundle running first time"),
            )
        });
    }

    /// Success transition: the host confirmed the update is healthy.
    ///
    /// Clears all persisted and in-memory state. Terminal and non-reporting.
    pub fn notify_ready(&self) {
        self.shielded("notify_ready", || {
            debug!("monitor: notify_ready");
            let mut st = self.lock_state();
            self.clear_locked(&mut st)
        });
    }

    /// Records an uncaught error thrown by the update's runtime code.
    ///
    /// Outside the health-check window this is a no-op (logged at debug,
    /// nothing persisted). Inside it, durably persists `JS_ERROR` and
    /// appends the rendered error to the trail.
    pub fn on_js_error(&self, err: impl fmt::Display) {
        self.on_js_exception("on_js_error", RollbackCause::JsError, &err);
    }

    /// Records an unhandled promise rejection from the update's runtime code.
    ///
    /// Same window guard and persistence pattern as [`Self::on_js_error`],
    /// persisting `JS_UNHANDLED_REJECTION`.
    pub fn on_js_unhandled_rejection(&self, err: impl fmt::Display) {
        self.on_js_exception(
            "on_js_unhandled_rejection",
            RollbackCause::JsUnhandledRejection,
            &err,
        );
    }

    fn on_js_exception(&self, op: &'static str, cause: RollbackCause, err: &dyn fmt::Display) {
        self.shielded(op, || {
            let mut st = self.lock_state();
            if !st.waiting_for_ready {
                debug!(op, "monitor: exception outside health-check window, skipped");
                return Ok(());
            }
            st.exception_while_waiting = true;
            self.journal.write_reason(cause)?;
            // Trail is best-effort evidence: an append failure must not
            // unwind past the reason already committed above.
            if let Err(append_err) = self.append_locked(&mut st, Event::now(format!("{op}: {err}")))
            {
                self.raise_fault(op, &append_err);
            }
            debug!(op, cause = %cause, "monitor: reason persisted");
            Ok(())
        });
    }

    /// Records an uncaught native crash.
    ///
    /// Same guard and persistence pattern as the runtime-exception entry
    /// points, persisting `NATIVE_CRASH` — but it does **not** set the
    /// `exception_while_waiting` flag, so a force-close arriving after a
    /// native crash still overwrites the reason with a force-quit variant.
    /// That asymmetry is pinned by a regression test; change it only on a
    /// product decision.
    pub fn on_native_crash(&self, err: impl fmt::Display) {
        self.shielded("on_native_crash", || {
            let mut st = self.lock_state();
            if !st.waiting_for_ready {
                debug!("monitor: native crash outside health-check window, skipped");
                return Ok(());
            }
            self.journal.write_reason(RollbackCause::NativeCrash)?;
            if let Err(append_err) =
                self.append_locked(&mut st, Event::now(format!("on_native_crash: {err}")))
            {
                self.raise_fault("on_native_crash", &append_err);
            }
            debug!(cause = %RollbackCause::NativeCrash, "monitor: reason persisted");
            Ok(())
        });
    }

    /// Ambiguous-failure transition: the host process is being torn down
    /// (e.g. the user swiped the task away).
    ///
    /// - Outside the health-check window: ordinary teardown — clear and
    ///   return, nothing to report.
    /// - Inside it with an already-classified exception: no-op, the stronger
    ///   reason must not be overwritten.
    /// - Otherwise: persist `FORCE_QUIT_SLOW_RUNTIME` or
    ///   `FORCE_QUIT_SLOW_NATIVE` depending on whether runtime code ever
    ///   started. State is deliberately *not* cleared — a later rollback
    ///   signal must still see this reason.
    pub fn on_force_close(&self) {
        self.shielded("on_force_close", || {
            let mut st = self.lock_state();
            if !st.waiting_for_ready {
                debug!("monitor: force close outside health-check window, clearing");
                return self.clear_locked(&mut st);
            }
            if st.exception_while_waiting {
                debug!("monitor: force close after classified exception, skipped");
                return Ok(());
            }
            let cause = if st.runtime_started {
                RollbackCause::ForceQuitSlowRuntime
            } else {
                RollbackCause::ForceQuitSlowNative
            };
            self.journal.write_reason(cause)?;
            if let Err(append_err) = self.append_locked(
                &mut st,
                Event::now(format!("on_force_close: suspected cause={cause}")),
            ) {
                self.raise_fault("on_force_close", &append_err);
            }
            Ok(())
        });
    }

    /// Terminal reporting transition: the update manager decided to roll
    /// back.
    ///
    /// Appends a final `"rollback"` marker to the in-memory trail, snapshots
    /// the trail by value, classifies the persisted reason (absent or
    /// unrecognized values classify as `UNKNOWN`), **synchronously** clears
    /// all persisted and in-memory state, and only then dispatches the
    /// formatted report fire-and-forget — so a rollback racing a fresh app
    /// launch can never observe stale state, regardless of whether the
    /// report has finished.
    ///
    /// Returns the classified cause; `None` only when the shield intercepted
    /// a panic. A failed state clear is routed to the fault path and the
    /// report still goes out — the snapshot and cause were taken before the
    /// clear, so there is nothing left to lose. Without a registered reporter
    /// the dispatch is a silent no-op.
    pub fn on_rollback(&self) -> Option<RollbackCause> {
        self.shielded("on_rollback", || {
            debug!("monitor: on_rollback");
            let mut st = self.lock_state();
            // Marker goes to the in-memory snapshot only; the trail is about
            // to be cleared, persisting it first would be an extra write the
            // snapshot never needs.
            st.events.push(Event::now("rollback"));
            let snapshot = st.events.clone();
            let cause = RollbackCause::classify(self.journal.read_reason().as_deref());
            if let Err(clear_err) = self.clear_locked(&mut st) {
                self.raise_fault("on_rollback", &clear_err);
            }
            drop(st);
            self.dispatch(snapshot, cause);
            Ok(cause)
        })
    }

    /// Returns a copy of the current in-memory trail. Mostly useful in tests
    /// and diagnostics; the trail is owned by the monitor and cleared by the
    /// terminal transitions.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.lock_state().events.clone()
    }

    fn append_locked(&self, st: &mut LifecycleState, event: Event) -> Result<(), MonitorError> {
        debug!(text = %event.text, at = event.timestamp_millis, "monitor: log");
        if event.text.contains(&self.config.runtime_started_marker) {
            st.runtime_started = true;
        }
        st.events.push(event);
        self.journal.save_events(&st.events)
    }

    fn clear_locked(&self, st: &mut LifecycleState) -> Result<(), MonitorError> {
        debug!("monitor: clearing state");
        st.runtime_started = false;
        st.waiting_for_ready = false;
        st.exception_while_waiting = false;
        st.events.clear();
        self.journal.clear()
    }

    /// Hands the report to a spawned task: format every snapshot event and
    /// deliver to the registered reporter. At-most-once; a missing runtime
    /// or a panicking reporter is routed to the fault path, never re-raised.
    fn dispatch(&self, snapshot: Vec<Event>, cause: RollbackCause) {
        let Some(reporter) = self.reporter.get().cloned() else {
            debug!("monitor: skipping rollback report: no reporter registered");
            return;
        };
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                self.raise_fault("on_rollback", &MonitorError::NoRuntime);
                return;
            }
        };
        let fault_reporter = self.fault_reporter.get().cloned();
        handle.spawn(async move {
            let lines: Vec<String> = snapshot.iter().map(Event::format_line).collect();
            debug!(cause = %cause, events = lines.len(), "monitor: delivering rollback report");
            let delivery = reporter.report(&lines, cause);
            if let Err(payload) = AssertUnwindSafe(delivery).catch_unwind().await {
                let err = MonitorError::Panicked {
                    message: panic_message(payload),
                };
                error!(reporter = reporter.name(), error = %err, "monitor: reporter panicked");
                if let Some(fault) = fault_reporter {
                    fault.fault("report", &err);
                }
            }
        });
    }

    /// Failure shield around every public operation: `Err` and panics are
    /// logged, forwarded to the fault reporter, and swallowed.
    fn shielded<T>(
        &self,
        op: &'static str,
        f: impl FnOnce() -> Result<T, MonitorError>,
    ) -> Option<T> {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(Ok(value)) => Some(value),
            Ok(Err(err)) => {
                self.raise_fault(op, &err);
                None
            }
            Err(payload) => {
                let err = MonitorError::Panicked {
                    message: panic_message(payload),
                };
                self.raise_fault(op, &err);
                None
            }
        }
    }

    fn raise_fault(&self, op: &'static str, error: &MonitorError) {
        error!(op, label = error.as_label(), error = %error, "monitor: internal failure shielded");
        if let Some(reporter) = self.fault_reporter.get() {
            reporter.fault(op, error);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, LifecycleState> {
        // A panic under the lock poisons it; the shield already reported the
        // panic, so recover the guard instead of cascading.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::MemoryStore;

    use async_trait::async_trait;
    use tokio::sync::mpsc;

    fn monitor(store: Arc<MemoryStore>) -> RollbackMonitor {
        RollbackMonitor::new(store, MonitorConfig::default())
    }

    /// Reporter that forwards every delivery into a channel.
    struct ChannelReporter {
        tx: mpsc::UnboundedSender<(Vec<String>, RollbackCause)>,
    }

    #[async_trait]
    impl Report for ChannelReporter {
        async fn report(&self, events: &[String], cause: RollbackCause) {
            let _ = self.tx.send((events.to_vec(), cause));
        }

        fn name(&self) -> &'static str {
            "channel"
        }
    }

    fn channel_reporter() -> (
        Arc<ChannelReporter>,
        mpsc::UnboundedReceiver<(Vec<String>, RollbackCause)>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(ChannelReporter { tx }), rx)
    }

    /// Fault reporter that collects (op, label) pairs.
    #[derive(Default)]
    struct CollectingFaults {
        seen: Mutex<Vec<(&'static str, &'static str)>>,
    }

    impl ReportFault for CollectingFaults {
        fn fault(&self, op: &'static str, error: &MonitorError) {
            self.seen.lock().unwrap().push((op, error.as_label()));
        }
    }

    /// Store whose writes always fail; reads succeed empty.
    struct WriteRefusingStore;

    impl Store for WriteRefusingStore {
        fn get(&self, _: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }
        fn set(&self, _: &str, _: &str) -> Result<(), StoreError> {
            Err(StoreError::backend("write refused"))
        }
        fn set_durable(&self, _: &str, _: &str) -> Result<(), StoreError> {
            Err(StoreError::backend("commit refused"))
        }
        fn remove_batch(&self, _: &[&str]) -> Result<(), StoreError> {
            Err(StoreError::backend("remove refused"))
        }
    }

    /// Store that accepts writes and reads but refuses to remove keys.
    struct RemoveRefusingStore {
        inner: MemoryStore,
    }

    impl Store for RemoveRefusingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }
        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.inner.set(key, value)
        }
        fn set_durable(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.inner.set_durable(key, value)
        }
        fn remove_batch(&self, _: &[&str]) -> Result<(), StoreError> {
            Err(StoreError::backend("remove refused"))
        }
    }

    #[test]
    fn test_restart_preserves_events_in_order() {
        let store = Arc::new(MemoryStore::new());
        {
            let m = monitor(store.clone());
            m.log_at("App started", 100);
            m.log_at("JS started", 200);
            m.log_at("warm cache", 300);
        }
        // Simulated process restart: a fresh monitor over the same store.
        let m = monitor(store);
        let trail = m.events();
        assert_eq!(
            trail,
            vec![
                Event::at("App started", 100),
                Event::at("JS started", 200),
                Event::at("warm cache", 300),
            ]
        );
    }

    #[test]
    fn test_notify_ready_clears_everything() {
        let store = Arc::new(MemoryStore::new());
        let m = monitor(store.clone());
        m.log("App started");
        m.begin_waiting_for_ready();
        m.on_js_error("boom");
        m.notify_ready();

        assert!(m.events().is_empty());
        assert!(store.is_empty(), "both durable keys must be gone");
    }

    #[test]
    fn test_exceptions_outside_window_do_not_touch_reason_slot() {
        let store = Arc::new(MemoryStore::new());
        let m = monitor(store.clone());
        m.on_js_error("early");
        m.on_js_unhandled_rejection("early");
        m.on_native_crash("early");
        assert_eq!(store.get("rollvisor.reason").unwrap(), None);
        assert!(m.events().is_empty(), "skipped signals are not logged");
    }

    #[test]
    fn test_stronger_reason_wins_over_force_close() {
        let store = Arc::new(MemoryStore::new());
        let m = monitor(store);
        m.begin_waiting_for_ready();
        m.on_js_error("TypeError: undefined is not a function");
        m.on_force_close();
        assert_eq!(m.on_rollback(), Some(RollbackCause::JsError));
    }

    #[test]
    fn test_force_close_before_runtime_start_is_slow_native() {
        let store = Arc::new(MemoryStore::new());
        let m = monitor(store);
        m.begin_waiting_for_ready();
        m.on_force_close();
        assert_eq!(m.on_rollback(), Some(RollbackCause::ForceQuitSlowNative));
    }

    #[test]
    fn test_force_close_after_runtime_start_is_slow_runtime() {
        let store = Arc::new(MemoryStore::new());
        let m = monitor(store);
        m.begin_waiting_for_ready();
        m.log("JS started (background)");
        m.on_force_close();
        assert_eq!(m.on_rollback(), Some(RollbackCause::ForceQuitSlowRuntime));
    }

    #[test]
    fn test_force_close_outside_window_clears_state() {
        let store = Arc::new(MemoryStore::new());
        let m = monitor(store.clone());
        m.log("App started");
        m.on_force_close();
        assert!(m.events().is_empty());
        assert!(store.is_empty());
    }

    /// Pins the inherited asymmetry: `on_native_crash` does not mark the
    /// window as exception-classified, so a later force-close overwrites
    /// `NATIVE_CRASH` with a force-quit reason.
    #[test]
    fn test_force_close_overwrites_native_crash_reason() {
        let store = Arc::new(MemoryStore::new());
        let m = monitor(store);
        m.begin_waiting_for_ready();
        m.on_native_crash("SIGSEGV in libfoo.so");
        m.on_force_close();
        assert_eq!(m.on_rollback(), Some(RollbackCause::ForceQuitSlowNative));
    }

    #[test]
    fn test_reason_slot_survives_restart_but_flags_do_not() {
        let store = Arc::new(MemoryStore::new());
        {
            let m = monitor(store.clone());
            m.begin_waiting_for_ready();
            m.on_js_unhandled_rejection("unhandled: fetch failed");
        }
        let m = monitor(store.clone());
        // Flags were reconstructed as false, so a force-close on the fresh
        // process is ordinary teardown... except the persisted reason and
        // trail are still there for a rollback to consume first.
        assert_eq!(m.on_rollback(), Some(RollbackCause::JsUnhandledRejection));
        assert!(store.is_empty());
    }

    #[test]
    fn test_waiting_flag_is_not_persisted() {
        let store = Arc::new(MemoryStore::new());
        {
            let m = monitor(store.clone());
            m.begin_waiting_for_ready();
            m.log("JS started");
        }
        let m = monitor(store.clone());
        m.on_force_close();
        // Outside the (unreloaded) window: teardown clears everything.
        assert!(store.is_empty());
        assert!(m.events().is_empty());
    }

    #[test]
    fn test_rollback_without_reason_is_unknown() {
        let store = Arc::new(MemoryStore::new());
        let m = monitor(store);
        m.log("App started");
        assert_eq!(m.on_rollback(), Some(RollbackCause::Unknown));
    }

    #[test]
    fn test_rollback_with_corrupt_reason_is_unknown() {
        let store = Arc::new(MemoryStore::new());
        store.set("rollvisor.reason", "JS_EROR").unwrap();
        let m = monitor(store);
        assert_eq!(m.on_rollback(), Some(RollbackCause::Unknown));
    }

    #[tokio::test]
    async fn test_rollback_clears_storage_before_report_completes() {
        let store = Arc::new(MemoryStore::new());
        let m = monitor(store.clone());
        let (reporter, mut rx) = channel_reporter();
        m.set_reporter(reporter);

        m.begin_waiting_for_ready();
        m.on_js_error("boom");
        let cause = m.on_rollback();

        // The spawned delivery task has not run yet on this current-thread
        // runtime, but storage and memory are already clean.
        assert_eq!(cause, Some(RollbackCause::JsError));
        assert!(store.is_empty());
        assert!(m.events().is_empty());

        let (lines, delivered) = rx.recv().await.expect("report delivered");
        assert_eq!(delivered, RollbackCause::JsError);
        assert_eq!(lines.len(), 3, "waiting marker, error, rollback marker");
        assert!(lines[1].contains("on_js_error: boom"));
        assert!(lines[2].ends_with(": rollback"));
    }

    #[tokio::test]
    async fn test_report_lines_are_formatted_chronologically() {
        let store = Arc::new(MemoryStore::new());
        let m = monitor(store);
        let (reporter, mut rx) = channel_reporter();
        m.set_reporter(reporter);

        // 2024-08-30 04:33:20.000 UTC
        m.log_at("App started", 1_724_992_400_000);
        m.on_rollback();

        let (lines, cause) = rx.recv().await.expect("report delivered");
        assert_eq!(cause, RollbackCause::Unknown);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "30/Aug/2024 04:33:20.000 UTC: App started");
        assert!(lines[1].ends_with(": rollback"));
    }

    #[tokio::test]
    async fn test_rollback_without_reporter_is_silent() {
        let store = Arc::new(MemoryStore::new());
        let m = monitor(store.clone());
        m.begin_waiting_for_ready();
        assert_eq!(m.on_rollback(), Some(RollbackCause::Unknown));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_second_reporter_registration_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        let m = monitor(store);
        let (first, mut first_rx) = channel_reporter();
        let (second, mut second_rx) = channel_reporter();
        m.set_reporter(first);
        m.set_reporter(second);

        m.on_rollback();

        let _ = first_rx.recv().await.expect("first reporter kept");
        assert!(second_rx.try_recv().is_err(), "second reporter never wired");
    }

    #[test]
    fn test_shield_routes_store_faults_without_propagating() {
        let m = RollbackMonitor::new(Arc::new(WriteRefusingStore), MonitorConfig::default());
        let faults = Arc::new(CollectingFaults::default());
        m.set_fault_reporter(faults.clone());

        // Every entry point hits the refusing store; none may panic or err.
        m.log("App started");
        m.begin_waiting_for_ready();
        m.on_js_error("boom");
        m.on_native_crash("boom");
        m.on_force_close();
        m.notify_ready();

        let seen = faults.seen.lock().unwrap();
        assert!(!seen.is_empty());
        assert!(seen.iter().all(|(_, label)| *label == "monitor_store"));
        assert!(seen.iter().any(|(op, _)| *op == "log"));
        assert!(seen.iter().any(|(op, _)| *op == "notify_ready"));
    }

    /// A store refusing key removal must not cost the rollback report: the
    /// snapshot and cause were taken before the clear, so the clear fault is
    /// routed to the fault reporter and delivery proceeds.
    #[tokio::test]
    async fn test_rollback_still_reports_when_clear_fails() {
        let store = Arc::new(RemoveRefusingStore {
            inner: MemoryStore::new(),
        });
        let m = RollbackMonitor::new(store, MonitorConfig::default());
        let (reporter, mut rx) = channel_reporter();
        let faults = Arc::new(CollectingFaults::default());
        m.set_reporter(reporter);
        m.set_fault_reporter(faults.clone());

        m.begin_waiting_for_ready();
        m.on_js_error("boom");
        let cause = m.on_rollback();

        assert_eq!(cause, Some(RollbackCause::JsError));
        // In-memory state is gone even though the durable keys linger.
        assert!(m.events().is_empty());

        let (lines, delivered) = rx.recv().await.expect("report still delivered");
        assert_eq!(delivered, RollbackCause::JsError);
        assert!(lines.iter().any(|l| l.contains("on_js_error: boom")));

        let seen = faults.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[("on_rollback", "monitor_store")]);
    }

    /// A failed trail append must not unwind an exception transition whose
    /// reason is already durable: the flag stays set, the reason survives,
    /// and only a fault is raised for the append.
    #[test]
    fn test_reason_outlives_failed_trail_append() {
        struct DurableOnlyStore {
            inner: MemoryStore,
        }

        impl Store for DurableOnlyStore {
            fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
                self.inner.get(key)
            }
            fn set(&self, _: &str, _: &str) -> Result<(), StoreError> {
                Err(StoreError::backend("write refused"))
            }
            fn set_durable(&self, key: &str, value: &str) -> Result<(), StoreError> {
                self.inner.set_durable(key, value)
            }
            fn remove_batch(&self, keys: &[&str]) -> Result<(), StoreError> {
                self.inner.remove_batch(keys)
            }
        }

        let store = Arc::new(DurableOnlyStore {
            inner: MemoryStore::new(),
        });
        let m = RollbackMonitor::new(store.clone(), MonitorConfig::default());
        let faults = Arc::new(CollectingFaults::default());
        m.set_fault_reporter(faults.clone());

        m.begin_waiting_for_ready();
        m.on_js_error("boom");

        // The durable reason landed even though no trail append could.
        assert_eq!(
            store.get("rollvisor.reason").unwrap().as_deref(),
            Some("JS_ERROR")
        );
        // The exception still counts: a force-close may not overwrite it.
        m.on_force_close();
        assert_eq!(m.on_rollback(), Some(RollbackCause::JsError));

        let seen = faults.seen.lock().unwrap();
        assert!(seen
            .iter()
            .any(|(op, label)| *op == "on_js_error" && *label == "monitor_store"));
    }

    #[test]
    fn test_dispatch_outside_runtime_reports_no_runtime_fault() {
        let store = Arc::new(MemoryStore::new());
        let m = monitor(store);
        let (reporter, _rx) = channel_reporter();
        let faults = Arc::new(CollectingFaults::default());
        m.set_reporter(reporter);
        m.set_fault_reporter(faults.clone());

        // Plain #[test]: no tokio runtime on this thread.
        let cause = m.on_rollback();

        assert_eq!(cause, Some(RollbackCause::Unknown), "clear still happened");
        let seen = faults.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[("on_rollback", "monitor_no_runtime")]);
    }

    #[tokio::test]
    async fn test_panicking_reporter_is_isolated() {
        struct Bomb;

        #[async_trait]
        impl Report for Bomb {
            async fn report(&self, _: &[String], _: RollbackCause) {
                panic!("reporter exploded");
            }
        }

        let store = Arc::new(MemoryStore::new());
        let m = monitor(store);
        let faults = Arc::new(CollectingFaults::default());
        m.set_reporter(Arc::new(Bomb));
        m.set_fault_reporter(faults.clone());

        m.on_rollback();
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        let seen = faults.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[("report", "monitor_panicked")]);
    }
}
