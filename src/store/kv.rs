//! # Persistence collaborator trait.
//!
//! Provides [`Store`], the seam between the monitor and whatever key-value
//! engine the host embeds (SharedPreferences, NSUserDefaults, a settings
//! file, ...). The engine itself is out of scope; the monitor only needs
//! string get/set/remove with two commit strengths.
//!
//! ## Durability contract
//! - [`Store::set`] may commit **eventually**: acceptable for plain trail
//!   appends, where losing the very last line to a concurrent kill is fine.
//! - [`Store::set_durable`] must commit **before returning**: the monitor
//!   calls it on crash paths (exception, native crash, force-close) where the
//!   process may be killed the instant the call returns.
//! - [`Store::remove_batch`] must remove all keys in one commit, so a clear
//!   never leaves the event log without its reason slot or vice versa.
//!
//! ## Rules for implementors
//! - Operations are called from host lifecycle threads, including crash
//!   handlers; do not block longer than the engine's own commit requires.
//! - Failures are returned as [`StoreError`]; the monitor shields them and
//!   degrades to a missing or partial report, never a crash.

use crate::error::StoreError;

/// Process-crash-safe string key-value storage.
///
/// Implementations must be safe to call from multiple host threads; the
/// monitor serializes its own state but not the store.
pub trait Store: Send + Sync {
    /// Reads the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes `value` under `key` with eventual durability.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Writes `value` under `key`, committing synchronously.
    ///
    /// The write must survive a process kill occurring immediately after
    /// this call returns.
    fn set_durable(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes every key in `keys` in a single commit.
    ///
    /// A reader observing the store after this call must see either all keys
    /// present (call never happened) or none of them.
    fn remove_batch(&self, keys: &[&str]) -> Result<(), StoreError>;
}
