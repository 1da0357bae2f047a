//! DOCX text extraction.
//!
//! A DOCX file is a ZIP archive whose main part holds the document body
//! as WordprocessingML. Visible text lives in `<w:t>` run elements; the
//! runs are joined with single spaces. Entities are left as-is, the
//! tokenizer drops `amp`, `lt` and friends anyway.

use super::Extraction;
use std::io::{Cursor, Read};
use zip::result::ZipError;
use zip::ZipArchive;

/// Local file header signature every ZIP archive starts with.
const ZIP_SIGNATURE: &[u8; 4] = b"PK\x03\x04";

/// Main document part names, tried in order.
const DOCUMENT_PARTS: [&str; 3] = ["word/document.xml", "Document.xml", "document.xml"];

const RUN_OPEN: &str = "<w:t";
const RUN_CLOSE: &str = "</w:t>";

/// Extracts the text runs of a DOCX document.
#[must_use]
pub fn extract(bytes: &[u8]) -> Extraction {
    if !bytes.starts_with(ZIP_SIGNATURE) {
        return Extraction::Unsupported;
    }

    let mut archive = match ZipArchive::new(Cursor::new(bytes)) {
        Ok(archive) => archive,
        Err(e) => {
            tracing::warn!("Corrupt DOCX archive: {}", e);
            return Extraction::Malformed;
        }
    };

    for part in DOCUMENT_PARTS {
        let mut file = match archive.by_name(part) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => continue,
            Err(e) => {
                tracing::warn!("Cannot open DOCX part {}: {}", part, e);
                return Extraction::Malformed;
            }
        };

        let mut raw = Vec::new();
        if let Err(e) = file.read_to_end(&mut raw) {
            tracing::warn!("Cannot read DOCX part {}: {}", part, e);
            return Extraction::Malformed;
        }
        return Extraction::Text(text_runs(&String::from_utf8_lossy(&raw)));
    }

    tracing::warn!("DOCX archive has no document part");
    Extraction::Malformed
}

/// Joins the contents of every `<w:t>` element with single spaces.
///
/// Matches `<w:t>` and `<w:t attr=...>` but not `<w:tab/>`, `<w:tbl>`
/// or a self-closing `<w:t/>`.
fn text_runs(xml: &str) -> String {
    let mut out = String::new();
    let mut rest = xml;

    while let Some(start) = rest.find(RUN_OPEN) {
        let after = &rest[start + RUN_OPEN.len()..];
        if !after.starts_with(['>', ' ', '\t', '\r', '\n']) {
            rest = after;
            continue;
        }
        let Some(tag_end) = after.find('>') else {
            break;
        };
        let body = &after[tag_end + 1..];
        if after[..tag_end].ends_with('/') {
            rest = body;
            continue;
        }
        let Some(close) = body.find(RUN_CLOSE) else {
            break;
        };

        let run = &body[..close];
        if !run.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(run);
        }
        rest = &body[close + RUN_CLOSE.len()..];
    }

    out.trim().to_string()
}
