use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::analyzer::NgramAnalyzer;

/// Shared token -> column index table
///
/// Column indices are dense in `[0, len)` and assigned in order of first
/// occurrence while scanning the strings, so identical input in identical
/// order always yields identical indices.
/// The table is immutable once built; tokens missing from it are ignored
/// by the vectorizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    tokens: IndexSet<Box<str>>,
}

impl Vocabulary {
    /// Build a vocabulary over every string of every collection
    ///
    /// # Arguments
    /// * `collections` - collections to scan in order, e.g. `[source, target]`
    /// * `analyzer` - n-gram extractor
    pub fn build<S>(collections: &[&[S]], analyzer: &NgramAnalyzer) -> Self
    where
        S: AsRef<str>,
    {
        let mut tokens: IndexSet<Box<str>> = IndexSet::new();
        let mut doc_num = 0usize;
        for collection in collections {
            for text in collection.iter() {
                doc_num += 1;
                for token in analyzer.analyze(text.as_ref()) {
                    if !tokens.contains(token.as_str()) {
                        tokens.insert(token.into_boxed_str());
                    }
                }
            }
        }
        tracing::debug!(
            strings = doc_num,
            vocab_size = tokens.len(),
            analyzer = ?analyzer.kind(),
            n = analyzer.n(),
            "built vocabulary"
        );
        Self { tokens }
    }

    /// Column index of `token`
    #[inline]
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.tokens.get_index_of(token)
    }

    /// Token stored at column `idx`
    #[inline]
    pub fn token(&self, idx: usize) -> Option<&str> {
        self.tokens.get_index(idx).map(|t| t.as_ref())
    }

    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// number of columns `K`
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// tokens in column order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Analyzer, TokenizeConfig};

    #[test]
    fn first_occurrence_order_and_dense_indices() {
        let analyzer = NgramAnalyzer::new(&TokenizeConfig::default().analyzer(Analyzer::Word).n(1));
        let source = ["beta alpha", "beta"];
        let target = ["gamma alpha"];
        let vocab = Vocabulary::build(&[&source[..], &target[..]], &analyzer);

        assert_eq!(vocab.iter().collect::<Vec<_>>(), vec!["beta", "alpha", "gamma"]);
        assert_eq!(vocab.index_of("beta"), Some(0));
        assert_eq!(vocab.index_of("gamma"), Some(2));
        assert_eq!(vocab.index_of("delta"), None);
        assert_eq!(vocab.token(1), Some("alpha"));
        assert!(vocab.token(3).is_none());
    }

    #[test]
    fn empty_input_gives_empty_vocabulary() {
        let analyzer = NgramAnalyzer::new(&TokenizeConfig::default());
        let empty: [&str; 0] = [];
        let vocab = Vocabulary::build(&[&empty[..], &empty[..]], &analyzer);
        assert!(vocab.is_empty());

        let vocab = Vocabulary::build(&[&["", "a"][..]], &NgramAnalyzer::new(&TokenizeConfig::default().n(4)));
        assert!(vocab.is_empty());
    }

    #[test]
    fn rebuild_is_deterministic() {
        let analyzer = NgramAnalyzer::new(&TokenizeConfig::default());
        let names = ["Apple Inc", "Microsoft Corp", "Apple"];
        let a = Vocabulary::build(&[&names[..]], &analyzer);
        let b = Vocabulary::build(&[&names[..]], &analyzer);
        assert_eq!(a, b);
    }
}
