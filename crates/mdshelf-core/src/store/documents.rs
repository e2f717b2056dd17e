use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{Document, FileEntry};
use crate::utils::format_age;

use super::StoreError;

/// On-disk layout of the store file.
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    documents: Vec<Document>,
    saved_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct StoreState {
    documents: Vec<Document>,
    saved_at: Option<DateTime<Utc>>,
}

/// Which branch an upsert took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Handle on the persistent document collection.
/// Clone is cheap - clones share the same state and file.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
    state: Arc<Mutex<StoreState>>,
}

impl DocumentStore {
    /// Open the store at `path`, loading existing records if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            let file: StoreFile = serde_json::from_str(&contents)?;
            debug!(path = %path.display(), count = file.documents.len(), "Store loaded");
            StoreState {
                documents: dedupe_titles(file.documents),
                saved_at: Some(file.saved_at),
            }
        } else {
            StoreState::default()
        };

        Ok(Self {
            path,
            state: Arc::new(Mutex::new(state)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // A writer that panicked never published its draft, so the data behind
    // a poisoned lock is still the last committed state.
    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `mutate` as a scoped write transaction.
    ///
    /// The closure works on a draft copy of the records. The draft replaces
    /// the live state only after it has been written to disk; if the closure
    /// or the write fails, the draft is dropped and the store is unchanged.
    fn transaction<R>(
        &self,
        mutate: impl FnOnce(&mut Vec<Document>) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut state = self.state();
        let mut draft = state.documents.clone();

        let result = mutate(&mut draft)?;
        if draft == state.documents {
            return Ok(result);
        }

        let saved_at = Utc::now();
        self.persist(&draft, saved_at)?;
        state.documents = draft;
        state.saved_at = Some(saved_at);
        Ok(result)
    }

    fn persist(&self, documents: &[Document], saved_at: DateTime<Utc>) -> Result<(), StoreError> {
        let file = StoreFileRef { documents, saved_at };
        let contents = serde_json::to_string_pretty(&file)?;

        // Write-then-rename so a crash never leaves a truncated store file
        let tmp = self.temp_path();
        std::fs::write(&tmp, contents)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            if let Err(cleanup) = std::fs::remove_file(&tmp) {
                debug!(path = %tmp.display(), error = %cleanup, "Failed to remove temp store file");
            }
            return Err(e.into());
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    // ===== Queries =====

    pub fn find_by_title(&self, title: &str) -> Option<Document> {
        self.state().documents.iter().find(|d| d.title == title).cloned()
    }

    /// All documents in insertion order.
    pub fn list_all(&self) -> Vec<Document> {
        self.state().documents.clone()
    }

    /// List projection of `list_all`.
    pub fn entries(&self) -> Vec<FileEntry> {
        self.state().documents.iter().map(Document::entry).collect()
    }

    pub fn len(&self) -> usize {
        self.state().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Age of the last committed write, e.g. "5m ago". None if never written.
    pub fn age_display(&self) -> Option<String> {
        self.state()
            .saved_at
            .map(|saved_at| format_age((Utc::now() - saved_at).num_minutes()))
    }

    // ===== Mutations =====

    /// Replace content and timestamp of `title`, or create it.
    pub fn upsert(&self, title: &str, content: &str, timestamp: &str) -> Result<UpsertOutcome, StoreError> {
        self.transaction(|documents| {
            match documents.iter_mut().find(|d| d.title == title) {
                Some(existing) => {
                    existing.content = content.to_string();
                    existing.last_modified = timestamp.to_string();
                    Ok(UpsertOutcome::Updated)
                }
                None => {
                    documents.push(Document::new(title, content, timestamp));
                    Ok(UpsertOutcome::Inserted)
                }
            }
        })
    }

    /// Remove `title`. Returns false (not an error) if it was not stored.
    pub fn delete(&self, title: &str) -> Result<bool, StoreError> {
        self.transaction(|documents| {
            let before = documents.len();
            documents.retain(|d| d.title != title);
            Ok(documents.len() != before)
        })
    }
}

/// Borrowed twin of `StoreFile` so persisting does not clone the records.
#[derive(Serialize)]
struct StoreFileRef<'a> {
    documents: &'a [Document],
    saved_at: DateTime<Utc>,
}

/// Keep the first record for each title.
fn dedupe_titles(documents: Vec<Document>) -> Vec<Document> {
    let mut seen = HashSet::new();
    documents
        .into_iter()
        .filter(|doc| {
            let fresh = seen.insert(doc.title.clone());
            if !fresh {
                warn!(title = %doc.title, "Dropping duplicate title from store file");
            }
            fresh
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const T1: &str = "2024/03/09/14:05:33";
    const T2: &str = "2024/03/10/09:00:00";

    fn open_temp() -> (TempDir, DocumentStore) {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::open(dir.path().join("documents.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let (_dir, store) = open_temp();
        assert!(store.is_empty());
        assert!(store.age_display().is_none());
    }

    #[test]
    fn test_upsert_inserts_then_updates_in_place() {
        let (_dir, store) = open_temp();

        assert_eq!(store.upsert("a.md", "one", T1).unwrap(), UpsertOutcome::Inserted);
        assert_eq!(store.upsert("b.md", "two", T1).unwrap(), UpsertOutcome::Inserted);
        assert_eq!(store.upsert("a.md", "uno", T2).unwrap(), UpsertOutcome::Updated);

        let all = store.list_all();
        assert_eq!(all.len(), 2);
        // Update keeps the original position
        assert_eq!(all[0], Document::new("a.md", "uno", T2));
        assert_eq!(all[1], Document::new("b.md", "two", T1));
    }

    #[test]
    fn test_find_by_title_is_exact() {
        let (_dir, store) = open_temp();
        store.upsert("Notes.md", "x", T1).unwrap();

        assert!(store.find_by_title("Notes.md").is_some());
        assert!(store.find_by_title("notes.md").is_none());
        assert!(store.find_by_title("Notes").is_none());
    }

    #[test]
    fn test_delete_is_noop_when_absent() {
        let (_dir, store) = open_temp();
        store.upsert("x.md", "body", T1).unwrap();

        assert!(store.delete("x.md").unwrap());
        assert!(store.find_by_title("x.md").is_none());
        assert!(!store.delete("x.md").unwrap());
        assert!(!store.delete("never-existed.md").unwrap());
    }

    #[test]
    fn test_records_survive_reopen() {
        let (dir, store) = open_temp();
        store.upsert("a.md", "# Hello", T1).unwrap();
        store.upsert("b.md", "World", T2).unwrap();
        drop(store);

        let reopened = DocumentStore::open(dir.path().join("documents.json")).unwrap();
        assert_eq!(reopened.list_all().len(), 2);
        assert_eq!(reopened.find_by_title("a.md").unwrap().content, "# Hello");
        assert_eq!(reopened.age_display().as_deref(), Some("just now"));
    }

    #[test]
    fn test_failed_transaction_rolls_back() {
        let (_dir, store) = open_temp();
        store.upsert("a.md", "original", T1).unwrap();

        let result: Result<(), StoreError> = store.transaction(|documents| {
            documents[0].content = "half-written".to_string();
            Err(std::io::Error::other("boom").into())
        });

        assert!(result.is_err());
        assert_eq!(store.find_by_title("a.md").unwrap().content, "original");
    }

    #[test]
    fn test_failed_persist_rolls_back() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("gone");
        let store = DocumentStore::open(root.join("documents.json")).unwrap();
        store.upsert("a.md", "original", T1).unwrap();

        std::fs::remove_dir_all(&root).unwrap();

        assert!(store.upsert("a.md", "changed", T2).is_err());
        assert!(store.upsert("b.md", "new", T2).is_err());
        assert_eq!(store.list_all(), vec![Document::new("a.md", "original", T1)]);
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("documents.json");
        let store = DocumentStore::open(&path).unwrap();
        // A non-empty directory at the target path makes the rename fail
        std::fs::create_dir_all(path.join("blocker")).unwrap();

        assert!(store.upsert("a.md", "body", T1).is_err());
        assert!(!store.temp_path().exists());
        assert!(store.is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let (_dir, store) = open_temp();
        let other = store.clone();
        store.upsert("a.md", "body", T1).unwrap();
        assert_eq!(other.entries(), vec![FileEntry {
            name: "a.md".to_string(),
            date_string: T1.to_string(),
        }]);
    }

    #[test]
    fn test_duplicate_titles_in_file_are_collapsed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("documents.json");
        std::fs::write(
            &path,
            r#"{
                "documents": [
                    {"title": "a.md", "date": "2024/01/01/00:00:00", "contents": "first"},
                    {"title": "a.md", "date": "2024/01/02/00:00:00", "contents": "second"}
                ],
                "saved_at": "2024-01-02T00:00:00Z"
            }"#,
        )
        .unwrap();

        let store = DocumentStore::open(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.find_by_title("a.md").unwrap().content, "first");
    }
}
