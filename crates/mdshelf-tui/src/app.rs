//! Application state management for mdshelf.
//!
//! This module contains the `App` struct that owns the document store, the
//! reconciler, and all UI state. Syncs run on a background task and report
//! back through an MPSC channel of `SyncEvent`s.

use std::sync::Arc;

use anyhow::{Context, Result};
use mdshelf_core::render::render_to_html;
use mdshelf_core::utils::contains_ignore_case;
use mdshelf_core::{
    CatalogClient, Config, DocumentStore, FileEntry, Reconciler, SyncEvent, UpsertOutcome,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for the base URL input.
const MAX_URL_LENGTH: usize = 256;

/// Maximum length for the search query.
const MAX_SEARCH_LENGTH: usize = 64;

/// Number of rows to move on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Current UI focus area (list panel or detail panel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Detail,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    EditingSettings,
    ConfirmingDelete,
    ConfirmingQuit,
    Quitting,
}

/// A document opened in the detail panel.
#[derive(Debug, Clone)]
pub struct DocumentView {
    pub name: String,
    pub date_string: String,
    /// Rendered HTML. Empty while nothing is available to show.
    pub html: String,
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,
    pub store: DocumentStore,
    reconciler: Arc<Reconciler>,

    // UI State
    pub state: AppState,
    pub focus: Focus,
    pub search_query: String,
    pub selection: usize,
    pub detail_scroll: u16,

    // Store projection, rebuilt on every store change
    pub entries: Vec<FileEntry>,
    pub detail: Option<DocumentView>,

    // Settings form state
    pub settings_input: String,
    pub settings_error: Option<String>,

    // Title awaiting delete confirmation
    pub pending_delete: Option<String>,

    pub status_message: Option<String>,
    pub sync_in_progress: bool,

    // Background task channel
    events_rx: mpsc::UnboundedReceiver<SyncEvent>,
    events_tx: mpsc::UnboundedSender<SyncEvent>,
}

fn build_reconciler(
    config: &Config,
    store: &DocumentStore,
    tx: &mpsc::UnboundedSender<SyncEvent>,
) -> Result<Arc<Reconciler>> {
    let client = CatalogClient::new(config).context("Failed to create catalog client")?;
    Ok(Arc::new(
        Reconciler::new(Arc::new(client), store.clone()).with_events(tx.clone()),
    ))
}

impl App {
    /// Create the application, opening the store named by `config`.
    pub fn new(config: Config) -> Result<Self> {
        let store_path = config.store_path()?;
        debug!(?store_path, "Opening document store");
        let store = DocumentStore::open(store_path).context("Failed to open document store")?;
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: DocumentStore) -> Result<Self> {
        // Unbounded: the UI task sends delete notifications to itself
        let (tx, rx) = mpsc::unbounded_channel();
        let reconciler = build_reconciler(&config, &store, &tx)?;

        Ok(Self {
            config,
            store,
            reconciler,

            state: AppState::Normal,
            focus: Focus::List,
            search_query: String::new(),
            selection: 0,
            detail_scroll: 0,

            entries: Vec::new(),
            detail: None,

            settings_input: String::new(),
            settings_error: None,

            pending_delete: None,

            status_message: None,
            sync_in_progress: false,

            events_rx: rx,
            events_tx: tx,
        })
    }

    // =========================================================================
    // Store Projection
    // =========================================================================

    /// Rebuild the list from the store.
    pub fn load_from_store(&mut self) {
        let entries = self.store.entries();
        self.set_entries(entries);
    }

    fn set_entries(&mut self, entries: Vec<FileEntry>) {
        self.entries = entries;
        self.clamp_selection();

        // The open document may have been updated or deleted
        if let Some(name) = self.detail.as_ref().map(|d| d.name.clone()) {
            if self.store.find_by_title(&name).is_some() {
                self.open_document(&name);
            } else {
                self.close_detail();
            }
        }
    }

    /// Entries matching the search query, in store order.
    pub fn filtered_entries(&self) -> Vec<&FileEntry> {
        self.entries
            .iter()
            .filter(|e| contains_ignore_case(&e.name, &self.search_query))
            .collect()
    }

    pub fn selected_entry(&self) -> Option<&FileEntry> {
        self.filtered_entries().get(self.selection).copied()
    }

    pub fn clamp_selection(&mut self) {
        let len = self.filtered_entries().len();
        self.selection = self.selection.min(len.saturating_sub(1));
    }

    pub fn store_age(&self) -> String {
        self.store.age_display().unwrap_or_else(|| "never".to_string())
    }

    // =========================================================================
    // Sync
    // =========================================================================

    /// Spawn a background sync unless one is already running.
    pub fn start_sync(&mut self) {
        if self.sync_in_progress {
            self.status_message = Some("Sync already in progress...".to_string());
            return;
        }

        info!(base_url = %self.config.base_url, "Starting background sync");
        self.sync_in_progress = true;
        self.status_message = Some("Syncing...".to_string());

        let reconciler = Arc::clone(&self.reconciler);
        tokio::spawn(async move {
            // Failures are reported through the event channel as well
            if let Err(e) = reconciler.sync().await {
                debug!(error = %e, "Background sync ended with error");
            }
        });
    }

    /// Drain and apply all pending sync events.
    pub fn check_background_tasks(&mut self) {
        let mut events = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            events.push(event);
        }

        for event in events {
            self.process_sync_event(event);
        }
    }

    fn process_sync_event(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::Started => {
                self.status_message = Some("Fetching document list...".to_string());
            }
            SyncEvent::DocumentSynced { name, outcome } => {
                let verb = match outcome {
                    UpsertOutcome::Inserted => "Added",
                    UpsertOutcome::Updated => "Updated",
                };
                self.status_message = Some(format!("{} {}", verb, name));
            }
            SyncEvent::DocumentFailed { name, error } => {
                warn!(name = %name, error = %error, "Document skipped during sync");
                self.status_message = Some(format!("Skipped {}", name));
            }
            SyncEvent::StoreChanged(entries) => {
                self.set_entries(entries);
            }
            SyncEvent::Finished(report) => {
                self.sync_in_progress = false;
                self.status_message = Some(report.summary());
            }
            SyncEvent::Aborted(reason) => {
                self.sync_in_progress = false;
                error!(reason = %reason, "Sync aborted");
                self.status_message = Some(format!("Sync failed: {}", reason));
            }
        }
    }

    /// One-shot re-read of the store.
    /// The list is rebuilt when the resulting `StoreChanged` event is drained.
    pub fn refresh(&mut self) {
        let entries = self.reconciler.refresh();
        self.status_message = Some(format!("{} documents", entries.len()));
    }

    // =========================================================================
    // Detail View
    // =========================================================================

    pub fn open_selected(&mut self) {
        if let Some(name) = self.selected_entry().map(|e| e.name.clone()) {
            self.open_document(&name);
            self.detail_scroll = 0;
            self.focus = Focus::Detail;
        }
    }

    fn open_document(&mut self, name: &str) {
        self.detail = self.store.find_by_title(name).map(|doc| DocumentView {
            html: render_to_html(&doc.content),
            name: doc.title,
            date_string: doc.last_modified,
        });
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
        self.detail_scroll = 0;
        self.focus = Focus::List;
    }

    // =========================================================================
    // Delete
    // =========================================================================

    pub fn request_delete(&mut self) {
        if let Some(name) = self.selected_entry().map(|e| e.name.clone()) {
            self.pending_delete = Some(name);
            self.state = AppState::ConfirmingDelete;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.state = AppState::Normal;
    }

    pub fn confirm_delete(&mut self) {
        self.state = AppState::Normal;
        let Some(name) = self.pending_delete.take() else {
            return;
        };

        match self.reconciler.delete_document(&name) {
            Ok(true) => {
                self.status_message = Some(format!("Deleted {}", name));
            }
            Ok(false) => {}
            Err(e) => {
                error!(name = %name, error = %e, "Failed to delete document");
                self.status_message = Some(format!("Delete failed: {}", e));
            }
        }
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub fn start_settings(&mut self) {
        self.settings_input = self.config.base_url.clone();
        self.settings_error = None;
        self.state = AppState::EditingSettings;
    }

    /// Apply the edited base URL and swap in a reconciler that uses it.
    pub fn apply_settings(&mut self) -> Result<()> {
        let mut config = self.config.clone();
        if let Err(e) = config.set_base_url(&self.settings_input) {
            self.settings_error = Some(e.to_string());
            return Err(e.into());
        }

        self.reconciler = build_reconciler(&config, &self.store, &self.events_tx)?;
        if let Err(e) = config.save() {
            warn!(error = %e, "Failed to save config");
        }
        info!(base_url = %config.base_url, "Base URL changed");
        self.status_message = Some(format!("Server set to {}", config.base_url));
        self.config = config;
        self.settings_error = None;
        self.state = AppState::Normal;
        Ok(())
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn select_next(&mut self, step: usize) {
        let len = self.filtered_entries().len();
        if len > 0 {
            self.selection = (self.selection + step).min(len - 1);
        }
    }

    pub fn select_prev(&mut self, step: usize) {
        self.selection = self.selection.saturating_sub(step);
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

pub fn can_add_url_char(current_len: usize, c: char) -> bool {
    current_len < MAX_URL_LENGTH && is_valid_input_char(c) && !c.is_whitespace()
}

pub fn can_add_search_char(current_len: usize, c: char) -> bool {
    current_len < MAX_SEARCH_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================
