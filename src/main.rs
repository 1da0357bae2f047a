//! wordex: directory word-frequency indexer.
//!
//! Usage:
//!   wordex index <dir>            # Walk a directory and store word counts
//!   wordex name <query>           # Files whose name contains <query>
//!   wordex content <query>        # Files containing a word, by frequency
//!   wordex path <query>           # Files whose path contains <query>
//!   wordex show <path-or-name>    # One file's metadata and top words
//!   wordex check <file>           # Run one file through extraction, no store
//!   wordex stats | clear

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wordex::fmt::{self as out, IndexStats};
use wordex::paths;
use wordex::services::{IndexProgress, ProgressCallback};
use wordex::{App, IndexConfig};

/// Progress is logged every this many files.
const PROGRESS_EVERY: usize = 100;

#[derive(Parser)]
#[command(name = "wordex")]
#[command(about = "Index directories into per-file word-frequency profiles")]
#[command(version)]
struct Cli {
    /// Database path (default: <cache dir>/wordex/file_index.db)
    #[arg(long, env = "WORDEX_DB", global = true)]
    db: Option<PathBuf>,

    /// Print JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk a directory and store the word counts of every file
    Index {
        /// Directory to index
        dir: String,

        /// Comma-separated extensions to index (default: built-in list)
        #[arg(short, long, value_delimiter = ',')]
        ext: Vec<String>,

        /// Index every file regardless of extension
        #[arg(long, conflicts_with = "ext")]
        all: bool,

        /// Skip hidden files and directories
        #[arg(long)]
        no_hidden: bool,

        /// Honor .gitignore and .ignore files
        #[arg(long)]
        gitignore: bool,

        /// Follow symbolic links
        #[arg(long)]
        follow_links: bool,
    },

    /// Find files whose name contains a substring
    Name { query: String },

    /// Find files containing a word, most occurrences first
    Content { query: String },

    /// Find files whose path contains a substring
    Path { query: String },

    /// Show one file's metadata and most frequent words
    Show {
        /// Exact path, partial path, or file name
        target: String,

        /// Number of top words to list
        #[arg(short, long, default_value = "20")]
        top: usize,
    },

    /// Extract and count one file without touching the index
    Check {
        /// File to process
        file: PathBuf,

        /// Number of top words to list
        #[arg(short, long, default_value = "20")]
        top: usize,
    },

    /// Show index statistics
    Stats,

    /// Delete everything from the index
    Clear,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries results
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("wordex=info".parse()?))
        .with_writer(io::stderr)
        .init();

    let color = !cli.no_color && !cli.json && io::stdout().is_terminal();
    let db_path = cli.db.clone().unwrap_or_else(wordex::default_db_path);

    let config = match &cli.command {
        Commands::Index {
            ext,
            all,
            no_hidden,
            gitignore,
            follow_links,
            ..
        } => index_config(ext, *all, *no_hidden, *gitignore, *follow_links),
        _ => IndexConfig::default(),
    };

    // Reject a bad root before the store is created
    if let Commands::Index { dir, .. } = &cli.command {
        paths::validate_directory(dir)?;
    }

    let app = if matches!(cli.command, Commands::Check { .. }) {
        App::in_memory(config)?
    } else {
        App::open(&db_path, config)
            .with_context(|| format!("cannot open index at {}", db_path.display()))?
    };

    let stdout = io::stdout();
    let mut w = stdout.lock();

    match cli.command {
        Commands::Index { dir, .. } => {
            let report = app.indexer.index(&dir, Some(progress_logger()))?;
            if cli.json {
                writeln!(w, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                out::fmt_index(&mut w, &report, color)?;
            }
        }

        Commands::Name { query } => {
            let results = app.search.search_by_name(&query)?;
            if cli.json {
                writeln!(w, "{}", serde_json::to_string_pretty(&results)?)?;
            } else {
                out::fmt_entries(&mut w, &results, color)?;
            }
        }

        Commands::Content { query } => {
            let results = app.search.search_by_content_ranked(&query)?;
            if cli.json {
                writeln!(w, "{}", serde_json::to_string_pretty(&results)?)?;
            } else {
                out::fmt_matches(&mut w, &results, color)?;
            }
        }

        Commands::Path { query } => {
            let results = app.search.search_by_partial_path(&query)?;
            if cli.json {
                writeln!(w, "{}", serde_json::to_string_pretty(&results)?)?;
            } else {
                out::fmt_entries(&mut w, &results, color)?;
            }
        }

        Commands::Show { target, top } => {
            let results = app.search.lookup(&target)?;
            if cli.json {
                writeln!(w, "{}", serde_json::to_string_pretty(&results)?)?;
            } else if let [entry] = results.as_slice() {
                out::fmt_details(&mut w, entry, top, color)?;
            } else if results.is_empty() {
                let total = app.search.indexed_file_count()?;
                anyhow::bail!("no indexed file matches '{target}' ({total} files indexed)");
            } else {
                out::fmt_entries(&mut w, &results, color)?;
            }
        }

        Commands::Check { file, top } => {
            let entry = app.indexer.process_file(&file)?;
            if cli.json {
                writeln!(w, "{}", serde_json::to_string_pretty(&entry)?)?;
            } else {
                out::fmt_details(&mut w, &entry, top, color)?;
            }
        }

        Commands::Stats => {
            let stats = IndexStats {
                db_path: db_path.display().to_string(),
                db_size: std::fs::metadata(&db_path).ok().map(|m| m.len()),
                files: app.db.file_count()?,
                content_rows: app.db.content_row_count()?,
                by_extension: app.db.extension_counts()?,
            };
            if cli.json {
                writeln!(w, "{}", serde_json::to_string_pretty(&stats)?)?;
            } else {
                out::fmt_stats(&mut w, &stats, color)?;
            }
        }

        Commands::Clear => {
            let before = app.search.indexed_file_count()?;
            app.search.clear_index()?;
            if cli.json {
                writeln!(w, "{}", serde_json::json!({ "cleared": before }))?;
            } else {
                writeln!(w, "Cleared {before} files")?;
            }
        }
    }

    Ok(())
}

fn index_config(
    ext: &[String],
    all: bool,
    no_hidden: bool,
    gitignore: bool,
    follow_links: bool,
) -> IndexConfig {
    let base = IndexConfig {
        include_hidden: !no_hidden,
        respect_gitignore: gitignore,
        follow_symlinks: follow_links,
        ..IndexConfig::default()
    };

    if all {
        base.with_extensions(Vec::<String>::new())
    } else if ext.is_empty() {
        base
    } else {
        base.with_extensions(ext)
    }
}

fn progress_logger() -> ProgressCallback {
    Box::new(|p: IndexProgress| {
        let done = p.files_processed + p.files_skipped;
        if p.current_file.is_some() && done % PROGRESS_EVERY == 0 {
            tracing::info!(
                "{} files seen ({} processed, {} skipped)",
                p.files_total,
                p.files_processed,
                p.files_skipped
            );
        }
    })
}
