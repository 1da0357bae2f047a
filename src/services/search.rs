//! Query surface over the index store.
//!
//! Name and content searches return metadata only. Path-based lookups
//! hydrate word counts eagerly, since callers use them to inspect a
//! specific file.

use crate::db::{ContentMatch, Database};
use crate::error::SearchResult;
use crate::paths;
use crate::types::FileEntry;
use std::str::FromStr;
use std::sync::Arc;

/// What a free-form query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Substring of the file name.
    FileName,
    /// Substring of a stored word.
    Content,
}

impl FromStr for SearchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" | "filename" | "file_name" => Ok(Self::FileName),
            "content" | "word" => Ok(Self::Content),
            other => Err(format!("unknown search type '{other}' (expected name or content)")),
        }
    }
}

/// Search service over a shared store.
pub struct SearchService {
    db: Arc<Database>,
}

impl SearchService {
    /// Creates a new search service.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Dispatches on `search_type`.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Store` if the store query fails.
    pub fn search(&self, query: &str, search_type: SearchType) -> SearchResult<Vec<FileEntry>> {
        match search_type {
            SearchType::FileName => self.search_by_name(query),
            SearchType::Content => self.search_by_content(query),
        }
    }

    /// Files whose name contains `query`, metadata only.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Store` if the store query fails.
    pub fn search_by_name(&self, query: &str) -> SearchResult<Vec<FileEntry>> {
        let results = self.db.search_by_name(query)?;
        tracing::debug!("Name search '{}': {} results", query, results.len());
        Ok(results)
    }

    /// Files containing a word that contains `query`, most relevant first,
    /// metadata only.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Store` if the store query fails.
    pub fn search_by_content(&self, query: &str) -> SearchResult<Vec<FileEntry>> {
        Ok(self
            .search_by_content_ranked(query)?
            .into_iter()
            .map(|m| m.entry)
            .collect())
    }

    /// Like [`search_by_content`](Self::search_by_content), keeping each
    /// file's relevance.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Store` if the store query fails.
    pub fn search_by_content_ranked(&self, query: &str) -> SearchResult<Vec<ContentMatch>> {
        let results = self.db.search_by_content(query)?;
        tracing::debug!("Content search '{}': {} results", query, results.len());
        Ok(results)
    }

    /// The file stored under exactly `path`, hydrated. Zero or one result.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Store` if the store query fails.
    pub fn search_by_exact_path(&self, path: &str) -> SearchResult<Vec<FileEntry>> {
        Ok(self.find_file(path)?.into_iter().collect())
    }

    /// Files whose path or name contains `partial`, hydrated.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Store` if the store query fails.
    pub fn search_by_partial_path(&self, partial: &str) -> SearchResult<Vec<FileEntry>> {
        let results = self.db.search_by_partial_path(partial)?;
        self.hydrate(results)
    }

    /// Files whose name contains `name`, hydrated.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Store` if the store query fails.
    pub fn search_by_partial_name(&self, name: &str) -> SearchResult<Vec<FileEntry>> {
        let results = self.db.search_by_name(name)?;
        self.hydrate(results)
    }

    /// The file stored under exactly `path`, hydrated.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Store` if the store query fails.
    pub fn find_file(&self, path: &str) -> SearchResult<Option<FileEntry>> {
        let Some(mut entry) = self.db.find_by_path(path)? else {
            return Ok(None);
        };
        self.db.load_word_counts(&mut entry)?;
        Ok(Some(entry))
    }

    /// Loads `entry`'s word counts from the store.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Store` if the store query fails.
    pub fn load_words(&self, entry: &mut FileEntry) -> SearchResult<()> {
        self.db.load_word_counts(entry)?;
        Ok(())
    }

    /// Resolves free-form user input to files, hydrated.
    ///
    /// Tries the normalized input as an exact path, then as a partial
    /// path, then its last segment as a partial name. The first
    /// non-empty result wins. Blank input matches nothing.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Store` if a store query fails.
    pub fn lookup(&self, input: &str) -> SearchResult<Vec<FileEntry>> {
        let Ok(normalized) = paths::normalize_input(input) else {
            return Ok(Vec::new());
        };

        let exact = self.search_by_exact_path(&normalized)?;
        if !exact.is_empty() {
            return Ok(exact);
        }

        let partial = self.search_by_partial_path(&normalized)?;
        if !partial.is_empty() {
            return Ok(partial);
        }

        let file_name = paths::file_name_of(&normalized);
        if file_name.is_empty() || file_name == normalized {
            return Ok(Vec::new());
        }
        self.search_by_partial_name(&file_name)
    }

    /// Number of files in the index.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Store` if the store query fails.
    pub fn indexed_file_count(&self) -> SearchResult<u64> {
        Ok(self.db.file_count()?)
    }

    /// Deletes every file and content row.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Store` if the store transaction fails.
    pub fn clear_index(&self) -> SearchResult<()> {
        self.db.clear()?;
        Ok(())
    }

    /// Persists a batch of entries. Returns the content rows written.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Store` if the batch transaction fails.
    pub fn save_batch(&self, entries: &mut [FileEntry]) -> SearchResult<usize> {
        Ok(self.db.save_batch(entries)?)
    }

    fn hydrate(&self, mut entries: Vec<FileEntry>) -> SearchResult<Vec<FileEntry>> {
        for entry in &mut entries {
            self.db.load_word_counts(entry)?;
        }
        Ok(entries)
    }
}
