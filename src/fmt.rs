//! Human-friendly CLI output formatters.
//!
//! Each `fmt_*` function formats one command's output for terminal
//! display. When `color` is true, ANSI escape codes are emitted via
//! `owo_colors`.

use crate::db::ContentMatch;
use crate::services::IndexReport;
use crate::types::FileEntry;
use chrono::{DateTime, Local};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::{self, Write};

/// Index statistics shown by the `stats` command.
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub db_path: String,
    pub db_size: Option<u64>,
    pub files: u64,
    pub content_rows: u64,
    pub by_extension: Vec<(String, u64)>,
}

/// Formats a byte count as B, KB, MB or GB.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    match bytes {
        b if b < KB => format!("{b} B"),
        b if b < MB => format!("{:.1} KB", b as f64 / KB as f64),
        b if b < GB => format!("{:.1} MB", b as f64 / MB as f64),
        b => format!("{:.1} GB", b as f64 / GB as f64),
    }
}

/// Formats epoch milliseconds as local `dd.mm.yyyy HH:MM`.
#[must_use]
pub fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis).map_or_else(
        || "-".to_string(),
        |dt| dt.with_timezone(&Local).format("%d.%m.%Y %H:%M").to_string(),
    )
}

// ── name / path search ──────────────────────────────────────────────────────

pub fn fmt_entries(w: &mut impl Write, entries: &[FileEntry], color: bool) -> io::Result<()> {
    if entries.is_empty() {
        return fmt_empty(w, color);
    }

    for e in entries {
        let meta = format!(
            "{} · {}",
            format_size(e.size),
            format_timestamp(e.last_modified)
        );
        if color {
            writeln!(w, "{}  ({})", e.path.bold(), meta.dimmed())?;
        } else {
            writeln!(w, "{}  ({})", e.path, meta)?;
        }
    }
    fmt_count(w, entries.len(), color)
}

// ── content search ──────────────────────────────────────────────────────────

pub fn fmt_matches(w: &mut impl Write, matches: &[ContentMatch], color: bool) -> io::Result<()> {
    if matches.is_empty() {
        return fmt_empty(w, color);
    }

    for m in matches {
        if color {
            writeln!(
                w,
                "{}  {}",
                format!("{:>7}", m.relevance).green(),
                m.entry.path.bold()
            )?;
        } else {
            writeln!(w, "{:>7}  {}", m.relevance, m.entry.path)?;
        }
    }
    fmt_count(w, matches.len(), color)
}

// ── show ────────────────────────────────────────────────────────────────────

/// Metadata plus the most frequent words of one hydrated entry.
pub fn fmt_details(
    w: &mut impl Write,
    entry: &FileEntry,
    top: usize,
    color: bool,
) -> io::Result<()> {
    let ext = if entry.extension.is_empty() {
        "-"
    } else {
        entry.extension.as_str()
    };
    let rows = [
        ("Path:", entry.path.clone()),
        ("Directory:", entry.directory().to_string()),
        ("Extension:", ext.to_string()),
        ("Size:", format!("{} ({})", format_size(entry.size), entry.size)),
        ("Modified:", format_timestamp(entry.last_modified)),
        ("Words:", entry.total_words().to_string()),
        ("Unique words:", entry.unique_words().to_string()),
    ];
    for (label, value) in rows {
        if color {
            writeln!(w, "{:<16} {}", label.bold(), value)?;
        } else {
            writeln!(w, "{label:<16} {value}")?;
        }
    }

    let words = entry.top_words(top);
    if !words.is_empty() {
        writeln!(w)?;
        if color {
            writeln!(w, "{}", "Top words:".bold())?;
        } else {
            writeln!(w, "Top words:")?;
        }
        for (word, count) in words {
            writeln!(w, "  {word:<24} {count}")?;
        }
    }

    Ok(())
}

// ── index ───────────────────────────────────────────────────────────────────

pub fn fmt_index(w: &mut impl Write, report: &IndexReport, color: bool) -> io::Result<()> {
    if color {
        writeln!(w, "{} {}", "Indexed".green().bold(), report.root)?;
    } else {
        writeln!(w, "Indexed {}", report.root)?;
    }
    writeln!(w, "  {:<12} {}", "total:", report.stats.files_total)?;
    writeln!(w, "  {:<12} {}", "processed:", report.stats.files_processed)?;
    writeln!(w, "  {:<12} {}", "skipped:", report.stats.files_skipped)?;
    writeln!(w, "  {:<12} {}", "word rows:", report.content_rows)?;
    Ok(())
}

// ── stats ───────────────────────────────────────────────────────────────────

pub fn fmt_stats(w: &mut impl Write, out: &IndexStats, color: bool) -> io::Result<()> {
    let size = out
        .db_size
        .map_or_else(|| "-".to_string(), |b| format!("{} ({b})", format_size(b)));

    if color {
        writeln!(w, "{:<16} {}", "Database:".bold(), out.db_path)?;
        writeln!(w, "{:<16} {}", "Size:".bold(), size)?;
        writeln!(w, "{:<16} {}", "Files:".bold(), out.files)?;
        writeln!(w, "{:<16} {}", "Word rows:".bold(), out.content_rows)?;
    } else {
        writeln!(w, "{:<16} {}", "Database:", out.db_path)?;
        writeln!(w, "{:<16} {}", "Size:", size)?;
        writeln!(w, "{:<16} {}", "Files:", out.files)?;
        writeln!(w, "{:<16} {}", "Word rows:", out.content_rows)?;
    }

    if !out.by_extension.is_empty() {
        writeln!(w)?;
        if color {
            writeln!(w, "{}", "By file type:".bold())?;
        } else {
            writeln!(w, "By file type:")?;
        }
        for (ext, count) in &out.by_extension {
            if ext.is_empty() {
                writeln!(w, "  {:<13} {count}", "(none)")?;
            } else {
                writeln!(w, "  .{ext:<12} {count}")?;
            }
        }
    }

    Ok(())
}

fn fmt_empty(w: &mut impl Write, color: bool) -> io::Result<()> {
    if color {
        writeln!(w, "{}", "No matches".dimmed())
    } else {
        writeln!(w, "No matches")
    }
}

fn fmt_count(w: &mut impl Write, n: usize, color: bool) -> io::Result<()> {
    let line = format!("{n} file{}", if n == 1 { "" } else { "s" });
    if color {
        writeln!(w, "{}", line.dimmed())
    } else {
        writeln!(w, "{line}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::indexer::WalkStats;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(50 * 1024 * 1024), "50.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn test_entries_plain() {
        let entries = vec![FileEntry::new("/d/a.txt", "a.txt", 10, 0, "txt")];
        let out = render(|w| fmt_entries(w, &entries, false));
        assert!(out.starts_with("/d/a.txt  (10 B · "));
        assert!(out.ends_with("1 file\n"));
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn test_empty_results() {
        let out = render(|w| fmt_entries(w, &[], false));
        assert_eq!(out, "No matches\n");
    }

    #[test]
    fn test_details_top_words() {
        let mut e = FileEntry::new("/d/a.txt", "a.txt", 10, 0, "txt");
        e.word_counts.insert("beta".into(), 2);
        e.word_counts.insert("alpha".into(), 5);
        let out = render(|w| fmt_details(w, &e, 10, false));

        let alpha = out.find("alpha").unwrap();
        let beta = out.find("beta").unwrap();
        assert!(alpha < beta);
        assert!(out.contains("Unique words:    2"));
    }

    #[test]
    fn test_index_report() {
        let report = IndexReport {
            root: "/d".into(),
            stats: WalkStats {
                files_total: 3,
                files_processed: 2,
                files_skipped: 1,
            },
            files_saved: 2,
            content_rows: 7,
        };
        let out = render(|w| fmt_index(w, &report, false));
        assert!(out.contains("processed:   2"));
        assert!(out.contains("word rows:   7"));
    }

    #[test]
    fn test_color_emits_ansi() {
        let entries = vec![FileEntry::new("/d/a.txt", "a.txt", 10, 0, "txt")];
        let out = render(|w| fmt_entries(w, &entries, true));
        assert!(out.contains('\u{1b}'));
    }
}
