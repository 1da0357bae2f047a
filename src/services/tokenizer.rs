//! Word-frequency builder.
//!
//! Turns extracted text into lowercase tokens and counts them into a
//! `FileEntry`. Input is bounded twice: the whole text and each line are
//! truncated before splitting, so a pathological file costs at most
//! `max_text_chars` of work.

use crate::types::FileEntry;

/// Maximum characters of (whitespace-collapsed) text tokenized per file.
pub const MAX_TEXT_CHARS: usize = 100_000;

/// Maximum characters tokenized per line.
pub const MAX_LINE_CHARS: usize = 10_000;

/// Maximum distinct words kept per file.
pub const MAX_UNIQUE_WORDS: usize = 100_000;

pub const MIN_TOKEN_CHARS: usize = 2;
pub const MAX_TOKEN_CHARS: usize = 50;

/// Markup entities and web/protocol fragments that carry no content.
const NOISE_WORDS: &[&str] = &[
    "nbsp", "amp", "lt", "gt", "quot", "apos", "http", "https", "www", "com", "org", "net",
    "xml", "html", "body", "div", "span", "class",
];

/// Tokenizer limits.
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    pub max_text_chars: usize,
    pub max_line_chars: usize,
    pub max_unique_words: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            max_text_chars: MAX_TEXT_CHARS,
            max_line_chars: MAX_LINE_CHARS,
            max_unique_words: MAX_UNIQUE_WORDS,
        }
    }
}

/// Counts produced by one `Tokenizer::process` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenStats {
    /// Occurrences added to the entry.
    pub accepted: usize,
    /// Occurrences of new words turned away by the distinct-word cap.
    pub capped: usize,
}

/// Splits text into filtered, lowercase tokens.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    config: TokenizerConfig,
}

impl Tokenizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: TokenizerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Accepted tokens of `text`, in order of appearance.
    #[must_use]
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let mut out = Vec::new();
        self.for_each_token(text, |token| out.push(token));
        out
    }

    /// Tokenizes `text` and adds every accepted token to `entry`.
    ///
    /// Each occurrence increments its word by one. Once the entry holds
    /// `max_unique_words` distinct words, new words are dropped while
    /// known words keep counting.
    pub fn process(&self, text: &str, entry: &mut FileEntry) -> TokenStats {
        let mut stats = TokenStats::default();
        let cap = self.config.max_unique_words;
        self.for_each_token(text, |token| {
            if entry.add_word(&token, cap) {
                stats.accepted += 1;
            } else {
                stats.capped += 1;
            }
        });

        if stats.capped > 0 {
            tracing::debug!(
                "Distinct word cap ({}) reached for {}, {} occurrences dropped",
                cap,
                entry.path,
                stats.capped
            );
        }
        stats
    }

    fn for_each_token(&self, text: &str, mut f: impl FnMut(String)) {
        let collapsed = collapse_whitespace(text, self.config.max_text_chars);

        for line in collapsed.lines() {
            let line = truncate_chars(line, self.config.max_line_chars);
            for candidate in line.split(|c: char| !is_token_char(c)) {
                if candidate.is_empty() {
                    continue;
                }
                let word = candidate.to_lowercase();
                if is_valid_token(&word) {
                    f(word);
                }
            }
        }
    }
}

/// Latin letters, Cyrillic letters, ASCII digits, `_` and `-`.
fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '_' | '-' | 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё')
}

/// Whether an already-lowercased word is kept as a token.
///
/// Rejects words outside 2..=50 characters, pure numbers, noise words,
/// and words made of one character repeated three or more times
/// (`aaa`, `----`). Two-character repeats such as `xx` are kept.
#[must_use]
pub fn is_valid_token(word: &str) -> bool {
    let len = word.chars().count();
    if !(MIN_TOKEN_CHARS..=MAX_TOKEN_CHARS).contains(&len) {
        return false;
    }
    if word.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    if NOISE_WORDS.contains(&word) {
        return false;
    }
    !is_single_char_run(word, len)
}

fn is_single_char_run(word: &str, len: usize) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => len >= 3 && chars.all(|c| c == first),
        None => false,
    }
}

/// Collapses whitespace runs and truncates to `max_chars` characters.
///
/// A run containing a line break becomes `\n`, any other run a single
/// space. Leading and trailing whitespace is dropped.
fn collapse_whitespace(text: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(text.len().min(max_chars * 2));
    let mut written = 0;
    let mut pending: Option<char> = None;

    for c in text.chars() {
        if written >= max_chars {
            break;
        }
        if c.is_whitespace() {
            if c == '\n' || c == '\r' {
                pending = Some('\n');
            } else if pending.is_none() {
                pending = Some(' ');
            }
            continue;
        }
        if let Some(sep) = pending.take() {
            if written > 0 {
                out.push(sep);
                written += 1;
                if written >= max_chars {
                    break;
                }
            }
        }
        out.push(c);
        written += 1;
    }

    out
}

fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(text: &str) -> FileEntry {
        let mut entry = FileEntry::new("/t.txt", "t.txt", 1, 0, "txt");
        Tokenizer::new().process(text, &mut entry);
        entry
    }

    #[test]
    fn test_reference_sentence() {
        let e = counts("Hello hello WORLD 123 aaaa xx");
        assert_eq!(e.word_count("hello"), 2);
        assert_eq!(e.word_count("world"), 1);
        assert_eq!(e.word_count("xx"), 1);
        assert!(!e.contains_word("123"));
        assert!(!e.contains_word("aaaa"));
        assert_eq!(e.unique_words(), 3);
        assert_eq!(e.total_words(), 4);
    }

    #[test]
    fn test_cyrillic_and_mixed_tokens() {
        let tokens = Tokenizer::new().tokens("Привет, мир! Ёлка и file_name-v2 (test)");
        assert_eq!(tokens, vec!["привет", "мир", "ёлка", "file_name-v2", "test"]);
    }

    #[test]
    fn test_noise_words_filtered() {
        let tokens = Tokenizer::new().tokens("&nbsp; <div class=\"x\">https://www.example.com</div>");
        assert_eq!(tokens, vec!["example"]);
    }

    #[test]
    fn test_length_bounds() {
        let fifty = "a".repeat(49) + "b";
        let fifty_one = "a".repeat(50) + "b";
        assert!(is_valid_token(&fifty));
        assert!(!is_valid_token(&fifty_one));
        assert!(!is_valid_token("a"));
        assert!(is_valid_token("ab"));
        // Length counts characters, not bytes
        assert!(is_valid_token("яя"));
    }

    #[test]
    fn test_repeat_rule() {
        assert!(is_valid_token("xx"));
        assert!(!is_valid_token("xxx"));
        assert!(!is_valid_token("---"));
        assert!(is_valid_token("aaab"));
        assert!(is_valid_token("--"));
    }

    #[test]
    fn test_digits_only_filtered_but_mixed_kept() {
        assert!(!is_valid_token("2024"));
        assert!(is_valid_token("v2024"));
        assert!(is_valid_token("2024-01"));
    }

    #[test]
    fn test_unique_cap_keeps_counting_known_words() {
        let tokenizer = Tokenizer::with_config(TokenizerConfig {
            max_unique_words: 2,
            ..TokenizerConfig::default()
        });
        let mut entry = FileEntry::new("/t.txt", "t.txt", 1, 0, "txt");
        let stats = tokenizer.process("alpha beta gamma alpha delta beta", &mut entry);

        assert_eq!(stats, TokenStats { accepted: 4, capped: 2 });
        assert_eq!(entry.word_count("alpha"), 2);
        assert_eq!(entry.word_count("beta"), 2);
        assert!(!entry.contains_word("gamma"));
    }

    #[test]
    fn test_line_truncation() {
        let tokenizer = Tokenizer::with_config(TokenizerConfig {
            max_line_chars: 10,
            ..TokenizerConfig::default()
        });
        let tokens = tokenizer.tokens("alpha beta gamma\ndelta epsilon");
        assert_eq!(tokens, vec!["alpha", "beta", "delta", "epsi"]);
    }

    #[test]
    fn test_text_truncation() {
        let tokenizer = Tokenizer::with_config(TokenizerConfig {
            max_text_chars: 11,
            ..TokenizerConfig::default()
        });
        let tokens = tokenizer.tokens("   alpha \t\t  beta gamma");
        assert_eq!(tokens, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \t b\r\n\r\n  c  ", 100), "a b\nc");
        assert_eq!(collapse_whitespace("", 100), "");
        assert_eq!(collapse_whitespace("abc def", 3), "abc");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("привет", 3), "при");
        assert_eq!(truncate_chars("ab", 5), "ab");
    }

    #[test]
    fn test_empty_text() {
        let e = counts("   \n\t ");
        assert_eq!(e.unique_words(), 0);
    }
}
