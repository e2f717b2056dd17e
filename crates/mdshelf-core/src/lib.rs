//! Core library for mdshelf.
//!
//! This crate contains the pieces shared by every mdshelf front end:
//!
//! - `api`: client for the remote Markdown catalog
//! - `store`: persistent local document store with scoped write transactions
//! - `sync`: reconciliation of the remote catalog against the local store
//! - `render`: Markdown to HTML conversion
//! - `config`: base URL and on-disk locations
//! - `models`: the `Document` record and its list projection

pub mod api;
pub mod config;
pub mod models;
pub mod render;
pub mod store;
pub mod sync;
pub mod utils;

pub use api::{ApiError, CatalogClient, CatalogSource};
pub use config::Config;
pub use models::{Document, FileEntry};
pub use store::{DocumentStore, StoreError, UpsertOutcome};
pub use sync::{Reconciler, SyncError, SyncEvent, SyncReport};
