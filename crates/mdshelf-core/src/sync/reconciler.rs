use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{ApiError, CatalogSource};
use crate::models::{timestamp_now, FileEntry};
use crate::store::{DocumentStore, StoreError};

use super::{SyncEvent, SyncReport};

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to fetch document list: {0}")]
    ListUnavailable(#[source] ApiError),
}

/// Keeps the local store in line with a remote catalog.
pub struct Reconciler {
    source: Arc<dyn CatalogSource>,
    store: DocumentStore,
    events: Option<mpsc::UnboundedSender<SyncEvent>>,
}

impl Reconciler {
    pub fn new(source: Arc<dyn CatalogSource>, store: DocumentStore) -> Self {
        Self {
            source,
            store,
            events: None,
        }
    }

    /// Publish progress and store-changed notifications on `tx`.
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<SyncEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    fn emit(&self, event: SyncEvent) {
        if let Some(ref tx) = self.events {
            if let Err(e) = tx.send(event) {
                debug!(error = %e, "Sync event dropped - receiver closed");
            }
        }
    }

    /// Run one sync.
    ///
    /// Fails only when the document list cannot be fetched, in which case
    /// the store is untouched. A document that fails to fetch or to save
    /// is recorded in the report and skipped; the rest still sync.
    pub async fn sync(&self) -> Result<SyncReport, SyncError> {
        info!("Sync started");
        self.emit(SyncEvent::Started);

        let names = match self.source.list_document_names().await {
            Ok(names) => names,
            Err(e) => {
                warn!(error = %e, "Sync aborted - document list unavailable");
                self.emit(SyncEvent::Aborted(e.to_string()));
                return Err(SyncError::ListUnavailable(e));
            }
        };

        let mut report = SyncReport::default();
        for name in &names {
            let existing = self.store.find_by_title(name);

            let content = match self.source.fetch_document(name).await {
                Ok(content) => content,
                Err(e) => {
                    warn!(name = %name, network = e.is_network(), error = %e, "Skipping document");
                    self.skip(&mut report, name, e.to_string());
                    continue;
                }
            };

            match self.store.upsert(name, &content, &timestamp_now()) {
                Ok(outcome) => {
                    debug!(name = %name, existed = existing.is_some(), ?outcome, "Document saved");
                    report.record(name, outcome);
                    self.emit(SyncEvent::DocumentSynced {
                        name: name.clone(),
                        outcome,
                    });
                }
                Err(e) => {
                    warn!(name = %name, error = %e, "Failed to save document, rolled back");
                    self.skip(&mut report, name, e.to_string());
                }
            }
        }

        self.refresh();

        info!(
            listed = names.len(),
            inserted = report.inserted.len(),
            updated = report.updated.len(),
            failed = report.failed.len(),
            "Sync complete"
        );
        self.emit(SyncEvent::Finished(report.clone()));
        Ok(report)
    }

    fn skip(&self, report: &mut SyncReport, name: &str, error: String) {
        report.failed.push((name.to_string(), error.clone()));
        self.emit(SyncEvent::DocumentFailed {
            name: name.to_string(),
            error,
        });
    }

    /// Remove a cached document. Absent titles are a silent no-op.
    pub fn delete_document(&self, title: &str) -> Result<bool, StoreError> {
        let removed = self.store.delete(title)?;
        if removed {
            info!(title = %title, "Document deleted");
            self.refresh();
        } else {
            debug!(title = %title, "Delete requested for unknown document");
        }
        Ok(removed)
    }

    /// Re-read the store and publish the projection.
    pub fn refresh(&self) -> Vec<FileEntry> {
        let entries = self.store.entries();
        self.emit(SyncEvent::StoreChanged(entries.clone()));
        entries
    }
}

// ============================================================================
// Tests
// ============================================================================
