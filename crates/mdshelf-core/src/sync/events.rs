use crate::models::FileEntry;
use crate::store::UpsertOutcome;

/// Outcome of one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub inserted: Vec<String>,
    pub updated: Vec<String>,
    /// Names that were skipped, with the reason.
    pub failed: Vec<(String, String)>,
}

impl SyncReport {
    pub fn record(&mut self, name: &str, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Inserted => self.inserted.push(name.to_string()),
            UpsertOutcome::Updated => self.updated.push(name.to_string()),
        }
    }

    pub fn synced(&self) -> usize {
        self.inserted.len() + self.updated.len()
    }

    /// One-line description for status bars and CLI output.
    pub fn summary(&self) -> String {
        let mut text = format!(
            "Synced {} documents ({} new, {} updated)",
            self.synced(),
            self.inserted.len(),
            self.updated.len()
        );
        if !self.failed.is_empty() {
            text.push_str(&format!(", {} failed", self.failed.len()));
        }
        text
    }
}

/// Messages sent from the reconciler to whoever displays the store.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// A sync run began
    Started,
    /// One document was written to the store
    DocumentSynced { name: String, outcome: UpsertOutcome },
    /// One document was skipped; the store entry for it is unchanged
    DocumentFailed { name: String, error: String },
    /// Fresh projection of the whole store after a sync or delete
    StoreChanged(Vec<FileEntry>),
    /// The sync run completed
    Finished(SyncReport),
    /// The document list could not be fetched; nothing was written
    Aborted(String),
}
