//! Query surface tests against an indexed document tree.

mod common;

use common::{document_tree, TestEnv};
use wordex::services::SearchType;
use wordex::FileEntry;

fn names(entries: &[FileEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.file_name.as_str()).collect()
}

#[test]
fn test_content_ranked_by_summed_counts() {
    let env = document_tree();
    env.index_all();

    let ranked = env.search.search_by_content_ranked("data").unwrap();
    let order: Vec<_> = ranked.iter().map(|m| (m.entry.path.clone(), m.relevance)).collect();

    assert_eq!(order[0], (env.stored_path("reports/2024/summary.txt"), 3));
    // Ties fall back to path order
    assert_eq!(order[1], (env.stored_path("notes/todo.md"), 1));
    assert_eq!(order[2], (env.stored_path("reports/2023/summary.txt"), 1));
    assert_eq!(order.len(), 3);
}

#[test]
fn test_content_search_is_case_insensitive_and_metadata_only() {
    let env = document_tree();
    env.index_all();

    let hits = env.search.search("QUARTERLY", SearchType::Content).unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].word_counts.is_empty());
}

#[test]
fn test_name_search() {
    let env = document_tree();
    env.index_all();

    let hits = env.search.search("summary", SearchType::FileName).unwrap();
    assert_eq!(names(&hits), vec!["summary.txt", "summary.txt"]);
    assert!(hits.iter().all(|e| e.word_counts.is_empty()));

    assert!(env.search.search_by_name("nomatch").unwrap().is_empty());
}

#[test]
fn test_partial_path_search() {
    let env = document_tree();
    env.index_all();

    let hits = env.search.search_by_partial_path("reports/2024").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].word_count("data"), 3);

    // Backslash input is normalized
    let hits = env.search.search_by_partial_path(r"reports\2023").unwrap();
    assert_eq!(hits.len(), 1);
}

#[test]
fn test_underscore_is_literal() {
    let env = TestEnv::new();
    env.write_file("data_export.csv", "rows");
    env.write_file("dataXexport.csv", "rows");
    env.index_all();

    let hits = env.search.search_by_name("a_e").unwrap();
    assert_eq!(names(&hits), vec!["data_export.csv"]);
}

#[test]
fn test_lookup_cascade() {
    let env = document_tree();
    env.index_all();

    let exact = env.search.lookup(&env.stored_path("notes/todo.md")).unwrap();
    assert_eq!(names(&exact), vec!["todo.md"]);
    assert!(exact[0].contains_word("milk"));

    let partial = env.search.lookup("docs/contract").unwrap();
    assert_eq!(names(&partial), vec!["contract.docx"]);

    let by_name = env.search.lookup("/moved/elsewhere/todo.md").unwrap();
    assert_eq!(names(&by_name), vec!["todo.md"]);
    assert!(by_name[0].contains_word("milk"));

    assert!(env.search.lookup("").unwrap().is_empty());
}

#[test]
fn test_clear_index() {
    let env = document_tree();
    env.index_all();
    assert!(env.search.indexed_file_count().unwrap() > 0);

    env.search.clear_index().unwrap();

    assert_eq!(env.search.indexed_file_count().unwrap(), 0);
    assert_eq!(env.db.content_row_count().unwrap(), 0);
    assert!(env.search.search_by_content("data").unwrap().is_empty());
}

#[test]
fn test_load_words_on_search_result() {
    let env = document_tree();
    env.index_all();

    let mut hit = env.search.search_by_name("contract").unwrap().remove(0);
    assert_eq!(hit.unique_words(), 0);
    env.search.load_words(&mut hit).unwrap();
    assert_eq!(hit.unique_words(), 4);
}
