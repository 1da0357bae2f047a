//! Common test utilities for wordex integration tests.
//!
//! Provides `TestEnv` for setting up isolated test environments with
//! database, search service, and indexer all wired together.

#![allow(dead_code)] // Test utilities may not all be used in every test file

use std::fs;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use wordex::db::Database;
use wordex::services::{IndexConfig, IndexReport, Indexer, SearchService};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// A complete test environment with all services wired together.
pub struct TestEnv {
    pub dir: TempDir,
    pub db: Arc<Database>,
    pub search: SearchService,
}

impl TestEnv {
    /// Creates a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let db = Arc::new(Database::in_memory().expect("Failed to create in-memory database"));
        let search = SearchService::new(Arc::clone(&db));

        Self { dir, db, search }
    }

    /// Creates an indexer with the default configuration.
    pub fn indexer(&self) -> Indexer {
        Indexer::new(Arc::clone(&self.db))
    }

    /// Creates an indexer with a custom configuration.
    pub fn indexer_with(&self, config: IndexConfig) -> Indexer {
        Indexer::with_config(Arc::clone(&self.db), config)
    }

    /// Writes a file to the test directory.
    pub fn write_file(&self, name: &str, content: impl AsRef<[u8]>) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write test file");
    }

    /// Writes a minimal DOCX whose body holds one run per word group.
    pub fn write_docx(&self, name: &str, runs: &[&str]) {
        let body: String = runs
            .iter()
            .map(|r| format!("<w:r><w:t>{r}</w:t></w:r>"))
            .collect();
        let xml = format!("<w:document><w:body><w:p>{body}</w:p></w:body></w:document>");

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .expect("Failed to start zip entry");
        writer
            .write_all(xml.as_bytes())
            .expect("Failed to write zip entry");
        let bytes = writer.finish().expect("Failed to finish zip").into_inner();
        self.write_file(name, bytes);
    }

    /// Indexes the whole test directory.
    pub fn index_all(&self) -> IndexReport {
        self.indexer()
            .index(&self.root(), None)
            .expect("Failed to index files")
    }

    /// Test directory as a string.
    pub fn root(&self) -> String {
        self.dir.path().to_string_lossy().into_owned()
    }

    /// Gets the full path to a file in the test directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Stored (forward-slash, canonical) path of a file in the test directory.
    pub fn stored_path(&self, name: &str) -> String {
        let canonical = dunce::canonicalize(self.dir.path()).expect("Failed to canonicalize root");
        wordex::paths::to_forward_slashes(&canonical.join(name).to_string_lossy())
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates a test environment with a small mixed document tree.
pub fn document_tree() -> TestEnv {
    let env = TestEnv::new();

    env.write_file(
        "reports/2024/summary.txt",
        "Quarterly data review. Data quality improved; data volume doubled.",
    );
    env.write_file(
        "reports/2023/summary.txt",
        "Annual review of data pipelines.",
    );
    env.write_file("notes/todo.md", "- buy milk\n- review data_export script\n");
    env.write_file("notes/.hidden/secret.txt", "hidden token");
    env.write_docx("docs/contract.docx", &["Договор поставки", "Contract terms"]);
    env.write_file("bin/tool.exe", [0x4d, 0x5a, 0x90, 0x00]);
    env.write_file("empty.log", "");

    env
}
