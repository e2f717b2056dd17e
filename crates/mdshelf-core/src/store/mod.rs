//! Local document store for offline access.
//!
//! This module provides the `DocumentStore`, a JSON-file backed keyed
//! collection of `Document`s. Every mutation runs inside a scoped write
//! transaction: either the whole change is committed to disk and published,
//! or nothing is.

pub mod documents;
pub mod error;

pub use documents::{DocumentStore, UpsertOutcome};
pub use error::StoreError;
