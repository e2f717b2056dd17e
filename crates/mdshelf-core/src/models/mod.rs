//! Data models for cached documents.
//!
//! - `Document`: the persisted record (title, Markdown contents, date)
//! - `FileEntry`: the lightweight projection shown in document lists

pub mod document;

pub use document::{timestamp_now, Document, FileEntry, TIMESTAMP_FORMAT};
