//! Evidence trail data model: events and classified causes.
//!
//! This module groups the **data model** half of the monitor: the timestamped
//! [`Event`] entries that make up the durable trail, and the [`RollbackCause`]
//! enumeration a trail is classified into when a rollback is reported.
//!
//! ## Contents
//! - [`Event`] one timestamped evidence line, serde-persisted
//! - [`RollbackCause`] fixed cause set + total classifier
//!
//! ## Quick reference
//! - **Producers**: every lifecycle entry point of
//!   [`RollbackMonitor`](crate::RollbackMonitor) appends an [`Event`].
//! - **Consumers**: the report dispatcher formats events into lines and pairs
//!   them with the classified [`RollbackCause`] for the
//!   [`Report`](crate::Report) collaborator.

mod cause;
mod event;

pub use cause::RollbackCause;
pub use event::Event;
