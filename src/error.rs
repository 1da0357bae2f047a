//! Error types for wordex.
//!
//! Uses thiserror for ergonomic error handling with proper
//! error chain propagation.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid path: {0}")]
    Path(#[from] PathError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Validation errors for user-supplied paths.
///
/// Raised before any filesystem walk or store access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path must not be empty\nhint: pass a directory such as D:/documents or /home/user/docs")]
    Empty,

    #[error("directory does not exist: {path}\nhint: {suggestion}")]
    NotFound { path: String, suggestion: String },

    #[error("not a directory: {path}\nhint: this is a file, pass its parent folder instead")]
    NotADirectory { path: String },

    #[error("directory is not readable: {path}\nhint: check access permissions")]
    Unreadable { path: String },
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Schema migration failed: {0}")]
    Migration(String),
}

/// Search operation errors.
///
/// Every store failure surfaces as the single `Store` kind.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("search failed: {0}")]
    Store(#[from] DbError),
}

/// Per-file indexing errors.
///
/// The walker recovers from these locally: the file is counted as skipped.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("File read error for {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to index file {path}: {reason}")]
    FileIndex { path: PathBuf, reason: String },
}

/// Result type alias for top-level operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for database operations.
pub type DbResult<T> = std::result::Result<T, DbError>;

/// Result type alias for search operations.
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Result type alias for per-file index operations.
pub type IndexResult<T> = std::result::Result<T, IndexError>;

impl Error {
    /// Returns a machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Path(e) => e.code(),
            Self::Database(e) => e.code(),
            Self::Search(e) => e.code(),
            Self::Index(e) => e.code(),
            Self::Io(_) => "IO_ERROR",
        }
    }
}

impl PathError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "PATH_EMPTY",
            Self::NotFound { .. } => "PATH_NOT_FOUND",
            Self::NotADirectory { .. } => "NOT_A_DIRECTORY",
            Self::Unreadable { .. } => "PATH_UNREADABLE",
        }
    }
}

impl DbError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "SQLITE_ERROR",
            Self::Pool(_) => "POOL_ERROR",
            Self::Migration(_) => "MIGRATION_ERROR",
        }
    }
}

impl SearchError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Store(_) => "SEARCH_STORE_ERROR",
        }
    }
}

impl IndexError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::FileRead { .. } => "FILE_READ_ERROR",
            Self::FileIndex { .. } => "FILE_INDEX_ERROR",
        }
    }
}
