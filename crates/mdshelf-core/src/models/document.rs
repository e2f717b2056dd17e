use chrono::Local;
use serde::{Deserialize, Serialize};

/// Format of `Document::last_modified`, e.g. `2024/03/09/14:05:33`.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d/%H:%M:%S";

/// Current local time formatted for `Document::last_modified`.
pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// A Markdown document cached from the remote catalog.
///
/// `title` is unique within a store. Field names on disk follow the
/// `{title, date, contents}` record layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    #[serde(rename = "contents")]
    pub content: String,
    #[serde(rename = "date")]
    pub last_modified: String,
}

impl Document {
    pub fn new(title: impl Into<String>, content: impl Into<String>, last_modified: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            last_modified: last_modified.into(),
        }
    }

    pub fn entry(&self) -> FileEntry {
        FileEntry {
            name: self.title.clone(),
            date_string: self.last_modified.clone(),
        }
    }
}

/// List row for a document. Rebuilt from the store, never written back.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileEntry {
    pub name: String,
    pub date_string: String,
}
