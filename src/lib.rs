//! wordex: directory indexer that builds per-file word-frequency profiles.
//!
//! This library walks a directory tree, extracts text from plain-text,
//! DOCX and PDF files, counts the words of each file, and stores the
//! profiles in `SQLite` for name-, path- and content-based lookup.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 CLI (clap)                   │
//! │   index, name, content, path, show, stats    │
//! └─────────────────┬───────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────┐
//! │                    App                       │
//! │       (wires store, indexer, search)         │
//! └───────┬─────────────────────────┬───────────┘
//!         │                         │
//! ┌───────▼──────────────┐  ┌───────▼───────────┐
//! │       Indexer        │  │   SearchService   │
//! │ walk → extract →     │  │ name / content /  │
//! │ tokenize → batch     │  │ path lookups      │
//! └───────┬──────────────┘  └───────┬───────────┘
//!         │                         │
//!    ┌────▼─────────────────────────▼────┐
//!    │          SQLite Database          │
//!    │  (r2d2 pool, single writer conn)  │
//!    └───────────────────────────────────┘
//! ```

pub mod db;
pub mod error;
pub mod fmt;
pub mod paths;
pub mod services;
pub mod types;

pub use db::{ContentMatch, Database};
pub use error::{Error, Result};
pub use services::{IndexConfig, Indexer, SearchService, SearchType};
pub use types::{FileEntry, FileId, WordCounts};

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Computes the default database path.
///
/// The path is `<cache dir>/wordex/file_index.db`, e.g.
/// `~/.cache/wordex/file_index.db` on Linux. Falls back to the current
/// directory when the platform has no cache directory.
#[must_use]
pub fn default_db_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wordex")
        .join("file_index.db")
}

/// The store, indexer and search service sharing one database.
pub struct App {
    pub db: Arc<Database>,
    pub indexer: Indexer,
    pub search: SearchService,
}

impl App {
    /// Opens (or creates) the database at `db_path`.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the parent directory cannot be created.
    /// Returns `Error::Database` if the database cannot be opened.
    pub fn open(db_path: &Path, config: IndexConfig) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        tracing::info!("Opening index at {}", db_path.display());
        let db = Database::open(db_path)?;
        Ok(Self::from_database(Arc::new(db), config))
    }

    /// Creates an app backed by an in-memory database.
    ///
    /// # Errors
    ///
    /// Returns `Error::Database` if the database cannot be created.
    pub fn in_memory(config: IndexConfig) -> Result<Self> {
        Ok(Self::from_database(Arc::new(Database::in_memory()?), config))
    }

    /// Wires services around an existing database.
    pub fn from_database(db: Arc<Database>, config: IndexConfig) -> Self {
        Self {
            indexer: Indexer::with_config(Arc::clone(&db), config),
            search: SearchService::new(Arc::clone(&db)),
            db,
        }
    }
}
