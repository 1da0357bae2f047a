//! Concurrent access tests for thread safety verification.
//!
//! The store hands out a single pooled connection, so concurrent readers
//! and writers are serialized. These tests check that shared services
//! never deadlock, panic, or observe a half-written batch.

mod common;

use common::document_tree;
use std::sync::Arc;
use std::thread;
use wordex::services::{Indexer, SearchService};
use wordex::FileEntry;

#[test]
fn test_concurrent_searches() {
    let env = document_tree();
    env.index_all();
    let search = Arc::new(SearchService::new(Arc::clone(&env.db)));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let search = Arc::clone(&search);
            thread::spawn(move || {
                for _ in 0..10 {
                    let hits = if i % 2 == 0 {
                        search.search_by_content("data").unwrap()
                    } else {
                        search.search_by_partial_path("reports").unwrap()
                    };
                    assert!(!hits.is_empty());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
}

#[test]
fn test_readers_never_see_partial_batch() {
    let env = document_tree();
    let db = Arc::clone(&env.db);
    let batch_size = 50;

    let writer = {
        let db = Arc::clone(&db);
        thread::spawn(move || {
            for round in 0..5 {
                let mut batch: Vec<FileEntry> = (0..batch_size)
                    .map(|i| {
                        let mut e = FileEntry::new(
                            format!("/r{round}/f{i}.txt"),
                            format!("f{i}.txt"),
                            1,
                            0,
                            "txt",
                        );
                        e.word_counts.insert("shared".to_string(), 1);
                        e
                    })
                    .collect();
                db.save_batch(&mut batch).unwrap();
            }
        })
    };

    let reader = {
        let db = Arc::clone(&db);
        thread::spawn(move || {
            for _ in 0..50 {
                let count = db.file_count().unwrap();
                assert_eq!(count % batch_size, 0, "saw {count} files mid-batch");
            }
        })
    };

    writer.join().expect("Writer panicked");
    reader.join().expect("Reader panicked");
    assert_eq!(db.file_count().unwrap(), 5 * batch_size);
}

#[test]
fn test_index_while_searching() {
    let env = document_tree();
    let indexer = Arc::new(Indexer::new(Arc::clone(&env.db)));
    let search = Arc::new(SearchService::new(Arc::clone(&env.db)));
    let root = env.root();

    let index_handle = {
        let indexer = Arc::clone(&indexer);
        thread::spawn(move || {
            for _ in 0..3 {
                indexer.index(&root, None).unwrap();
            }
        })
    };

    let search_handle = {
        let search = Arc::clone(&search);
        thread::spawn(move || {
            for _ in 0..20 {
                let n = search.indexed_file_count().unwrap();
                assert!(n == 0 || n == 5, "unexpected file count {n}");
            }
        })
    };

    index_handle.join().expect("Indexer panicked");
    search_handle.join().expect("Searcher panicked");
    assert_eq!(env.search.indexed_file_count().unwrap(), 5);
}
