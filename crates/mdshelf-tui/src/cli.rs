//! Non-interactive commands.
//!
//! These run against the same store and server as the TUI and log to stderr.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use mdshelf_core::render::render_to_html;
use mdshelf_core::{CatalogClient, Config, DocumentStore, FileEntry, Reconciler};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Sync,
    List,
    Render(String),
    Delete(String),
}

impl Command {
    /// Parse the arguments after the program name.
    /// Returns `None` when no command flag is present so the TUI starts.
    pub fn parse(args: &[String]) -> Result<Option<Self>> {
        let Some(flag) = args.first() else {
            return Ok(None);
        };

        let title = || {
            args.get(1)
                .cloned()
                .ok_or_else(|| anyhow!("{} requires a document title", flag))
        };

        let command = match flag.as_str() {
            "--sync" => Self::Sync,
            "--list" => Self::List,
            "--render" => Self::Render(title()?),
            "--delete" => Self::Delete(title()?),
            other => bail!(
                "Unknown argument: {}\nUsage: mdshelf [--sync | --list | --render <title> | --delete <title>]",
                other
            ),
        };
        Ok(Some(command))
    }

    pub async fn run(self, config: Config) -> Result<()> {
        let store_path = config.store_path()?;
        let store = DocumentStore::open(&store_path)
            .with_context(|| format!("Failed to open store at {}", store_path.display()))?;

        match self {
            Self::Sync => {
                let reconciler = build_reconciler(&config, store)?;

                eprintln!("Syncing from {}...", config.base_url);
                let report = reconciler.sync().await?;
                for (name, error) in &report.failed {
                    eprintln!("  Skipped {}: {}", name, error);
                }
                eprintln!("{}", report.summary());
            }
            Self::List => {
                for entry in store.entries() {
                    println!("{}", list_line(&entry));
                }
            }
            Self::Render(title) => {
                let document = store
                    .find_by_title(&title)
                    .ok_or_else(|| anyhow!("No cached document named {:?}", title))?;
                println!("{}", render_to_html(&document.content));
            }
            Self::Delete(title) => {
                let reconciler = build_reconciler(&config, store)?;
                if reconciler.delete_document(&title)? {
                    eprintln!("Deleted {}", title);
                } else {
                    eprintln!("No cached document named {:?}", title);
                }
            }
        }
        Ok(())
    }
}

fn build_reconciler(config: &Config, store: DocumentStore) -> Result<Reconciler> {
    let client = CatalogClient::new(config).context("Failed to create catalog client")?;
    Ok(Reconciler::new(Arc::new(client), store))
}

/// One `--list` output line: `name<TAB>date`.
fn list_line(entry: &FileEntry) -> String {
    format!("{}\t{}", entry.name, entry.date_string)
}

/// Load the config, falling back to defaults when it cannot be read.
pub fn load_config() -> Config {
    Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        Config::default()
    })
}
