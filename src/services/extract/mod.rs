//! Content extraction.
//!
//! Each supported format turns raw file bytes into plain text:
//! - plain text: charset detection over a fixed fallback chain
//! - DOCX: text runs of the main document part
//! - PDF: text layer via `pdf-extract`, encrypted files refused
//!
//! Format problems are not errors. They come back as an [`Extraction`]
//! variant so the walker can still record the file. Only failing to read
//! the file at all is an `IndexError`.

pub mod docx;
pub mod pdf;
pub mod text;

use crate::error::{IndexError, IndexResult};
use std::path::Path;

/// Outcome of extracting text from one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Extracted text, possibly empty.
    Text(String),
    /// Bytes are not in the format the extension claims.
    Unsupported,
    /// Document is password protected.
    Encrypted,
    /// Format recognized but the document could not be parsed.
    Malformed,
}

impl Extraction {
    /// Extracted text, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Short label used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Unsupported => "unsupported",
            Self::Encrypted => "encrypted",
            Self::Malformed => "malformed",
        }
    }
}

/// Extractor selected from a file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Docx,
    Pdf,
}

impl DocumentFormat {
    /// Chooses the extractor for a lowercase extension.
    ///
    /// `docx` and `docm` are word-processing archives, `pdf` is PDF, and
    /// everything else is read as plain text.
    #[must_use]
    pub fn from_extension(extension: &str) -> Self {
        match extension {
            "docx" | "docm" => Self::Docx,
            "pdf" => Self::Pdf,
            _ => Self::PlainText,
        }
    }
}

/// Reads a file and extracts its text.
///
/// # Errors
///
/// Returns `IndexError::FileRead` if the file cannot be read.
pub fn extract_file(path: &Path, format: DocumentFormat) -> IndexResult<Extraction> {
    let bytes = std::fs::read(path).map_err(|source| IndexError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let extraction = extract_bytes(&bytes, format);
    if !matches!(extraction, Extraction::Text(_)) {
        tracing::warn!(
            "No text extracted from {} ({})",
            path.display(),
            extraction.kind()
        );
    }
    Ok(extraction)
}

/// Extracts text from in-memory file contents.
#[must_use]
pub fn extract_bytes(bytes: &[u8], format: DocumentFormat) -> Extraction {
    match format {
        DocumentFormat::PlainText => Extraction::Text(text::decode(bytes).text),
        DocumentFormat::Docx => docx::extract(bytes),
        DocumentFormat::Pdf => pdf::extract(bytes),
    }
}
