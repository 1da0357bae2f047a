//! Directory walker and file indexer.
//!
//! Walks a directory tree, filters candidate files, extracts their text,
//! and builds one `FileEntry` per accepted file. `Indexer::index` then
//! persists the whole walk as a single batch.
//!
//! Every regular file (or link to one) the walk reaches is counted exactly
//! once, either as processed or as skipped, so `files_total ==
//! files_processed + files_skipped` always holds.

use crate::db::Database;
use crate::error::{IndexError, IndexResult, Result};
use crate::paths;
use crate::services::extract::{self, DocumentFormat, Extraction};
use crate::services::tokenizer::{Tokenizer, TokenizerConfig};
use crate::types::FileEntry;
use ahash::AHashSet;
use ignore::WalkBuilder;
use serde::Serialize;
use std::fmt;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Files larger than this are skipped (50 MiB).
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Extensions indexed when none are configured explicitly.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "txt", "java", "xml", "json", "csv", "md", "properties", "html", "htm", "css", "js", "py",
    "cpp", "c", "h", "sql", "log", "cfg", "conf", "ini", "yml", "yaml", "docx", "docm", "pdf",
    "rtf", "doc", "odt", "epub", "fb2",
];

/// Prefix of office lock files (`~$report.docx`).
const LOCK_FILE_PREFIX: &str = "~$";

/// Progress callback type.
pub type ProgressCallback = Box<dyn Fn(IndexProgress) + Send + Sync>;

/// Walk progress information.
#[derive(Debug, Clone)]
pub struct IndexProgress {
    pub files_total: usize,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub current_file: Option<PathBuf>,
}

/// Configuration for walking and indexing.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Include hidden files and directories
    pub include_hidden: bool,
    /// Follow symlinks
    pub follow_symlinks: bool,
    /// Honor .gitignore / .ignore files
    pub respect_gitignore: bool,
    /// Maximum file size to index (bytes)
    pub max_file_size: u64,
    /// Lowercase extensions to index (empty = every file)
    pub extensions: Vec<String>,
    /// Token limits
    pub tokenizer: TokenizerConfig,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            include_hidden: true,
            follow_symlinks: false,
            respect_gitignore: false,
            max_file_size: MAX_FILE_SIZE,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
            tokenizer: TokenizerConfig::default(),
        }
    }
}

impl IndexConfig {
    /// Replaces the extension allow-list.
    ///
    /// Entries are trimmed, lowercased and stripped of a leading dot;
    /// blank entries are dropped. An empty list accepts every file.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .filter_map(|e| normalize_extension(e.as_ref()))
            .collect();
        self
    }
}

/// `" .TXT "` becomes `txt`; blank entries yield `None`.
fn normalize_extension(ext: &str) -> Option<String> {
    let ext = ext.trim().trim_start_matches('.').to_lowercase();
    (!ext.is_empty()).then_some(ext)
}

/// Walk counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WalkStats {
    pub files_total: usize,
    pub files_processed: usize,
    pub files_skipped: usize,
}

/// Entries built by one walk, with counters.
#[derive(Debug, Clone, Default)]
pub struct WalkReport {
    pub root: PathBuf,
    pub entries: Vec<FileEntry>,
    pub stats: WalkStats,
}

/// Result of a walk followed by a batch save.
#[derive(Debug, Clone, Serialize)]
pub struct IndexReport {
    pub root: String,
    #[serde(flatten)]
    pub stats: WalkStats,
    pub files_saved: usize,
    pub content_rows: usize,
}

/// Why a file was left out of the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    LockFile,
    Extension,
    Empty,
    TooLarge(u64),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LockFile => write!(f, "office lock file"),
            Self::Extension => write!(f, "extension not indexed"),
            Self::Empty => write!(f, "empty file"),
            Self::TooLarge(size) => write!(f, "too large ({size} bytes)"),
        }
    }
}

/// Regular files, plus unfollowed symlinks that do not point at a
/// directory. A dangling link is a candidate so it is counted as skipped.
fn is_candidate(entry: &ignore::DirEntry) -> bool {
    match entry.file_type() {
        Some(ft) if ft.is_file() => true,
        Some(ft) if ft.is_symlink() => !fs::metadata(entry.path()).is_ok_and(|m| m.is_dir()),
        _ => false,
    }
}

enum Visit {
    Indexed(FileEntry),
    Skipped(SkipReason),
    Failed(IndexError),
}

/// Directory walker and file indexer.
pub struct Indexer {
    db: Arc<Database>,
    tokenizer: Tokenizer,
    extensions: AHashSet<String>,
    config: IndexConfig,
}

impl Indexer {
    /// Creates an indexer with the default configuration.
    pub fn new(db: Arc<Database>) -> Self {
        Self::with_config(db, IndexConfig::default())
    }

    /// Creates an indexer with custom configuration.
    pub fn with_config(db: Arc<Database>, config: IndexConfig) -> Self {
        Self {
            db,
            tokenizer: Tokenizer::with_config(config.tokenizer.clone()),
            extensions: config
                .extensions
                .iter()
                .filter_map(|e| normalize_extension(e))
                .collect(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Walks `root` and persists every accepted file as one batch.
    ///
    /// # Errors
    ///
    /// Returns `Error::Path` if `root` is not a readable directory.
    /// Returns `Error::Database` if the batch save fails; nothing from
    /// this walk is persisted in that case.
    pub fn index(&self, root: &str, progress: Option<ProgressCallback>) -> Result<IndexReport> {
        let mut report = self.walk(root, progress)?;
        let root = paths::to_forward_slashes(&report.root.to_string_lossy());

        let content_rows = if report.entries.is_empty() {
            tracing::info!("Nothing to save for {}", root);
            0
        } else {
            self.db.save_batch(&mut report.entries)?
        };

        tracing::info!(
            "Indexed {}: {} processed, {} skipped, {} content rows",
            root,
            report.stats.files_processed,
            report.stats.files_skipped,
            content_rows
        );

        Ok(IndexReport {
            root,
            stats: report.stats,
            files_saved: report.entries.len(),
            content_rows,
        })
    }

    /// Walks `root` and builds an entry for every accepted file.
    ///
    /// Per-file failures are counted as skipped and never abort the walk.
    ///
    /// # Errors
    ///
    /// Returns `Error::Path` if `root` is empty, missing, not a directory,
    /// or unreadable.
    pub fn walk(&self, root: &str, progress: Option<ProgressCallback>) -> Result<WalkReport> {
        let root = paths::validate_directory(root)?;
        tracing::info!("Walking {}", root.display());

        let walker = WalkBuilder::new(&root)
            .standard_filters(false)
            .hidden(!self.config.include_hidden)
            .follow_links(self.config.follow_symlinks)
            .ignore(self.config.respect_gitignore)
            .git_ignore(self.config.respect_gitignore)
            .git_global(self.config.respect_gitignore)
            .git_exclude(self.config.respect_gitignore)
            .parents(self.config.respect_gitignore)
            .build();

        let mut stats = WalkStats::default();
        let mut entries = Vec::new();

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    stats.files_total += 1;
                    stats.files_skipped += 1;
                    tracing::warn!("Walk error: {}", e);
                    continue;
                }
            };
            if !is_candidate(&entry) {
                continue;
            }

            let path = entry.path();
            stats.files_total += 1;

            match self.visit(path) {
                Visit::Indexed(file) => {
                    stats.files_processed += 1;
                    entries.push(file);
                }
                Visit::Skipped(reason) => {
                    stats.files_skipped += 1;
                    tracing::debug!("Skipped {}: {}", path.display(), reason);
                }
                Visit::Failed(e) => {
                    stats.files_skipped += 1;
                    tracing::warn!("Failed to index {}: {}", path.display(), e);
                }
            }

            if let Some(ref cb) = progress {
                cb(IndexProgress {
                    files_total: stats.files_total,
                    files_processed: stats.files_processed,
                    files_skipped: stats.files_skipped,
                    current_file: Some(path.to_path_buf()),
                });
            }
        }

        if let Some(ref cb) = progress {
            cb(IndexProgress {
                files_total: stats.files_total,
                files_processed: stats.files_processed,
                files_skipped: stats.files_skipped,
                current_file: None,
            });
        }

        tracing::info!(
            "Walk finished: {} files, {} processed, {} skipped",
            stats.files_total,
            stats.files_processed,
            stats.files_skipped
        );

        Ok(WalkReport {
            root,
            entries,
            stats,
        })
    }

    /// Builds the entry for a single file, without the walk's filters.
    ///
    /// Files whose content cannot be extracted still yield an entry with
    /// empty word counts.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::FileRead` if the file cannot be read.
    /// Returns `IndexError::FileIndex` if the path is not a regular file.
    pub fn process_file(&self, path: &Path) -> IndexResult<FileEntry> {
        let metadata = fs::metadata(path).map_err(|source| IndexError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        if !metadata.is_file() {
            return Err(IndexError::FileIndex {
                path: path.to_path_buf(),
                reason: "not a regular file".to_string(),
            });
        }
        self.build_entry(path, &metadata)
    }

    /// Whether a file name passes the lock-file and extension filters.
    #[must_use]
    pub fn accepts(&self, file_name: &str) -> bool {
        self.name_filter(file_name).is_none()
    }

    fn name_filter(&self, file_name: &str) -> Option<SkipReason> {
        if file_name.starts_with(LOCK_FILE_PREFIX) {
            return Some(SkipReason::LockFile);
        }
        if self.extensions.is_empty() {
            return None;
        }
        match paths::extension_of(file_name) {
            Some(ext) if self.extensions.contains(&ext) => None,
            _ => Some(SkipReason::Extension),
        }
    }

    fn visit(&self, path: &Path) -> Visit {
        let file_name = paths::file_name_of(&path.to_string_lossy());
        if let Some(reason) = self.name_filter(&file_name) {
            return Visit::Skipped(reason);
        }

        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(source) => {
                return Visit::Failed(IndexError::FileRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let size = metadata.len();
        if size == 0 {
            return Visit::Skipped(SkipReason::Empty);
        }
        if size > self.config.max_file_size {
            return Visit::Skipped(SkipReason::TooLarge(size));
        }

        match self.build_entry(path, &metadata) {
            Ok(entry) => Visit::Indexed(entry),
            Err(e) => Visit::Failed(e),
        }
    }

    fn build_entry(&self, path: &Path, metadata: &Metadata) -> IndexResult<FileEntry> {
        let mut entry = FileEntry::from_metadata(path, metadata);
        let format = DocumentFormat::from_extension(&entry.extension);

        match extract::extract_file(path, format)? {
            Extraction::Text(text) => {
                self.tokenizer.process(&text, &mut entry);
            }
            Extraction::Encrypted => {
                tracing::info!("Encrypted document recorded without content: {}", entry.path);
            }
            Extraction::Unsupported | Extraction::Malformed => {}
        }

        Ok(entry)
    }
}
