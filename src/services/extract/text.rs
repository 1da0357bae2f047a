//! Plain-text decoding with charset fallback.

use encoding_rs::{Encoding, KOI8_R, UTF_8, WINDOWS_1251, WINDOWS_1252};

/// Charsets tried in order. The first one that decodes cleanly wins.
const FALLBACK_CHAIN: [&Encoding; 4] = [UTF_8, WINDOWS_1251, KOI8_R, WINDOWS_1252];

/// Decoded file contents.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub text: String,
    pub encoding: &'static Encoding,
    /// True when every charset failed and invalid bytes were replaced.
    pub lossy: bool,
}

/// Decodes file bytes into text.
///
/// A byte-order mark selects its encoding directly. Otherwise the
/// fallback chain is tried: UTF-8, Windows-1251, KOI8-R, Windows-1252.
/// A single-byte decode that produces C1 control characters counts as a
/// failure, since real text in those charsets never contains them. If
/// nothing decodes cleanly the bytes are read as UTF-8 with replacement.
#[must_use]
pub fn decode(bytes: &[u8]) -> Decoded {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return Decoded {
            text: text.into_owned(),
            encoding,
            lossy: had_errors,
        };
    }

    for encoding in FALLBACK_CHAIN {
        if let Some(text) = decode_strict(encoding, bytes) {
            if encoding != UTF_8 {
                tracing::debug!("Decoded {} bytes as {}", bytes.len(), encoding.name());
            }
            return Decoded {
                text,
                encoding,
                lossy: false,
            };
        }
    }

    Decoded {
        text: String::from_utf8_lossy(bytes).into_owned(),
        encoding: UTF_8,
        lossy: true,
    }
}

fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    let text = encoding.decode_without_bom_handling_and_without_replacement(bytes)?;
    if encoding != UTF_8 && text.chars().any(is_c1_control) {
        return None;
    }
    Some(text.into_owned())
}

fn is_c1_control(c: char) -> bool {
    ('\u{80}'..='\u{9f}').contains(&c)
}
