//! Core domain types for wordex.
//!
//! `FileEntry` is the unit that flows from the walker through the
//! tokenizer into the store, and back out of the store on search.

use crate::paths;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use std::fs::Metadata;
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Lowercase token → occurrence count.
pub type WordCounts = AHashMap<String, u32>;

/// Store-assigned identifier for an indexed file.
///
/// Mirrors the SQLite rowid of the `files` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub i64);

impl FileId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.0;
        write!(f, "file:{id}")
    }
}

impl From<i64> for FileId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// One indexed file: metadata plus its word-frequency profile.
///
/// `word_counts` is empty for entries reconstructed from the store until
/// they are explicitly hydrated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: Option<FileId>,
    /// Absolute path with forward slashes; unique in the store.
    pub path: String,
    pub file_name: String,
    /// Lowercase, without the leading dot. Empty when the name has none.
    pub extension: String,
    pub size: u64,
    /// Epoch milliseconds.
    pub last_modified: i64,
    #[serde(default)]
    pub word_counts: WordCounts,
}

impl FileEntry {
    /// Builds an entry from explicit metadata (used when reading rows back).
    #[must_use]
    pub fn new(
        path: impl Into<String>,
        file_name: impl Into<String>,
        size: u64,
        last_modified: i64,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            path: path.into(),
            file_name: file_name.into(),
            extension: extension.into(),
            size,
            last_modified,
            word_counts: WordCounts::new(),
        }
    }

    /// Builds an entry from a file on disk, reading its attributes once.
    ///
    /// The extension is derived here and never recomputed.
    #[must_use]
    pub fn from_metadata(path: &Path, metadata: &Metadata) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = paths::extension_of(&file_name).unwrap_or_default();
        let last_modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |d| d.as_millis() as i64);

        Self::new(
            paths::to_forward_slashes(&path.to_string_lossy()),
            file_name,
            metadata.len(),
            last_modified,
            extension,
        )
    }

    /// Counts one occurrence of `word`.
    ///
    /// New keys are admitted only while fewer than `max_unique` keys exist;
    /// known keys always increment. Returns whether the occurrence was counted.
    pub fn add_word(&mut self, word: &str, max_unique: usize) -> bool {
        if let Some(count) = self.word_counts.get_mut(word) {
            *count = count.saturating_add(1);
            return true;
        }
        if self.word_counts.len() >= max_unique {
            return false;
        }
        self.word_counts.insert(word.to_string(), 1);
        true
    }

    /// Sum of all occurrence counts.
    #[must_use]
    pub fn total_words(&self) -> u64 {
        self.word_counts.values().map(|&c| u64::from(c)).sum()
    }

    /// Number of distinct words.
    #[must_use]
    pub fn unique_words(&self) -> usize {
        self.word_counts.len()
    }

    #[must_use]
    pub fn word_count(&self, word: &str) -> u32 {
        self.word_counts
            .get(&word.to_lowercase())
            .copied()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn contains_word(&self, word: &str) -> bool {
        self.word_counts.contains_key(&word.to_lowercase())
    }

    /// Parent directory portion of `path` (empty for bare names).
    #[must_use]
    pub fn directory(&self) -> &str {
        match self.path.rfind('/') {
            Some(idx) if idx > 0 => &self.path[..idx],
            _ => "",
        }
    }

    /// Most frequent words, highest count first, ties ordered by word.
    #[must_use]
    pub fn top_words(&self, n: usize) -> Vec<(&str, u32)> {
        let mut words: Vec<(&str, u32)> = self
            .word_counts
            .iter()
            .map(|(w, &c)| (w.as_str(), c))
            .collect();
        words.sort_unstable_by_key(|&(w, c)| (Reverse(c), w));
        words.truncate(n);
        words
    }
}

// Compile-time assertions for thread safety.
#[cfg(test)]
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<FileId>();
    assert_send_sync::<FileEntry>();
};
