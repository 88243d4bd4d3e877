/// This crate matches names between two collections by TF-IDF weighted
/// n-gram vectors and a sparse top-n cosine similarity product.
pub mod config;
pub mod error;
pub mod matcher;
pub mod utils;
pub mod vectorizer;

/// Fuzzy matcher
/// The top-level struct of this crate.
/// Holds a source and a target collection of names and matches them in two
/// phases: `tokenize` builds the shared n-gram vocabulary, `match_names`
/// derives TF-IDF vectors for both sides and keeps the best `ntop` targets
/// per source above `lower_bound`.
///
/// `match_strings` runs both phases in one call.
pub use matcher::{match_strings, FuzzRush};

/// Configuration values
/// - `TokenizeConfig`: analyzer (`CharWb`, `Char`, `Word`), gram length, lowercasing
/// - `MatchConfig`: `ntop`, `lower_bound`, parallel switch
/// - `OutputFormat`: `Flat` records or `Grouped` by source index
///
/// Every value is checked by `validate()` before any work starts.
pub use config::{Analyzer, MatchConfig, OutputFormat, TokenizeConfig};

/// Error type and result alias
pub use error::{FuzzRushError, Result};

/// Match output structures
/// - `MatchOutput`: tagged by `OutputFormat`
/// - `FlatMatches` / `MatchRecord`: one record per match, row-major
/// - `GroupedMatches`: source index -> (target index, score) list
pub use matcher::assemble::{FlatMatches, GroupedMatches, MatchOutput, MatchRecord};

/// Sparse top-n similarity engine
/// Computes, for each row of `A` (`M x K`), the `ntop` largest entries of
/// `A * B_T` (`B_T`: `K x N`) that reach `lower_bound`, without building the
/// dense `M x N` product.
/// `par_sparse_dot_topn` spreads rows over the rayon pool and returns the
/// same matrix as the sequential version.
pub use matcher::top_n::{par_sparse_dot_topn, sparse_dot_topn, TopNAccumulator};

/// Vectorization building blocks
/// - `NgramAnalyzer`: string -> n-gram tokens
/// - `Vocabulary`: token -> dense column index, first-occurrence order
/// - `TermFrequency`: per-string column counts
/// - `TFIDFVectorizer`: collection -> CSR matrix of L2-normalized TF-IDF rows
/// - `TFIDFEngine` / `DefaultTFIDFEngine`: pluggable weighting, smoothed IDF by default
pub use vectorizer::{
    analyzer::NgramAnalyzer,
    term::TermFrequency,
    tfidf::{DefaultTFIDFEngine, TFIDFEngine},
    vocabulary::Vocabulary,
    TFIDFVectorizer,
};

/// Compressed sparse row matrix and its row view
pub use utils::sparse::{CsrMatrix, SparseRow};
