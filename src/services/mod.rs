//! Core services: extraction, tokenization, indexing and search.

pub mod extract;
pub mod indexer;
mod search;
pub mod tokenizer;

pub use extract::{DocumentFormat, Extraction};
pub use indexer::{
    IndexConfig, IndexProgress, IndexReport, Indexer, ProgressCallback, WalkReport, WalkStats,
    DEFAULT_EXTENSIONS,
};
pub use search::{SearchService, SearchType};
pub use tokenizer::{Tokenizer, TokenizerConfig};
