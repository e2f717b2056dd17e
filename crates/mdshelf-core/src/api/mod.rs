//! REST client module for the Markdown catalog server.
//!
//! The server exposes two endpoints:
//!
//! - `GET {base}/get_markdown` returns a JSON array of document names
//! - `GET {base}/get_markdown/{name}` returns one document's Markdown body
//!
//! `CatalogSource` is the seam the sync reconciler depends on;
//! `CatalogClient` is the HTTP implementation.

pub mod client;
pub mod error;

pub use client::{CatalogClient, CatalogSource};
pub use error::ApiError;
