//! Durable persistence: the storage seam and the journal built on it.
//!
//! The monitor must survive an unexpected process death between any two
//! steps, so everything it cannot afford to lose goes through this module:
//!
//! ```text
//!  RollbackMonitor
//!        │
//!        ▼
//!     Journal ── event log key ──► one JSON array blob (whole trail)
//!        │  └──  reason slot key ─► plain canonical cause string
//!        ▼
//!  trait Store (host-provided engine: get / set / set_durable / remove_batch)
//! ```
//!
//! ## Contents
//! - [`Store`] host-implemented key-value collaborator trait
//! - [`Journal`] the two durable keys + read-side corruption tolerance
//! - [`MemoryStore`] in-process implementation for tests and demos

mod journal;
mod kv;
mod memory;

pub use journal::Journal;
pub use kv::Store;
pub use memory::MemoryStore;
