//! Reconciliation of the remote catalog against the local store.
//!
//! A sync lists the remote document names (all-or-nothing), then fetches
//! and upserts each document in order (best-effort per document). Local
//! documents missing from the remote list are left alone; removal only
//! happens through an explicit `Reconciler::delete_document`.
//!
//! Progress and the "store changed" notification are published as
//! `SyncEvent`s on an optional channel.

pub mod events;
pub mod reconciler;

pub use events::{SyncEvent, SyncReport};
pub use reconciler::{Reconciler, SyncError};
