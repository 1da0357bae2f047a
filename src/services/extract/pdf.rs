//! PDF text extraction.

use super::Extraction;
use lopdf::Document;
use pdf_extract::PlainTextOutput;
use std::panic::{self, AssertUnwindSafe};

/// Extracts the text layer of a PDF.
///
/// The document is parsed once; a trailer `/Encrypt` entry refuses it
/// before any page is read. Parser errors and parser panics both map to
/// `Extraction::Malformed`; a broken PDF never takes the walk down.
#[must_use]
pub fn extract(bytes: &[u8]) -> Extraction {
    let doc = match panic::catch_unwind(|| Document::load_mem(bytes)) {
        Ok(Ok(doc)) => doc,
        Ok(Err(e)) => {
            tracing::warn!("PDF parse failed: {}", e);
            return Extraction::Malformed;
        }
        Err(_) => {
            tracing::warn!("PDF parser panicked");
            return Extraction::Malformed;
        }
    };

    if doc.is_encrypted() {
        tracing::warn!("Skipping encrypted PDF");
        return Extraction::Encrypted;
    }

    match panic::catch_unwind(AssertUnwindSafe(|| page_text(&doc))) {
        Ok(Ok(text)) => Extraction::Text(text),
        Ok(Err(e)) => {
            tracing::warn!("PDF text extraction failed: {}", e);
            Extraction::Malformed
        }
        Err(_) => {
            tracing::warn!("PDF parser panicked");
            Extraction::Malformed
        }
    }
}

fn page_text(doc: &Document) -> Result<String, pdf_extract::OutputError> {
    let mut text = String::new();
    {
        let mut output = PlainTextOutput::new(&mut text);
        pdf_extract::output_doc(doc, &mut output)?;
    }
    Ok(text)
}
