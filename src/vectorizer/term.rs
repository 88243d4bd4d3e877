use std::collections::HashMap;

use ahash::RandomState;

use crate::utils::sort::radix_sort_u32_soa;

use super::vocabulary::Vocabulary;

/// TermFrequency struct
/// Counts how often each vocabulary column occurs in one string.
/// Tokens that are not in the vocabulary are dropped on insertion.
///
/// # Examples
/// ```
/// use fuzz_rush::{NgramAnalyzer, TermFrequency, TokenizeConfig, Vocabulary};
///
/// let analyzer = NgramAnalyzer::new(&TokenizeConfig::default());
/// let vocab = Vocabulary::build(&[&["aaaa"][..]], &analyzer);
/// let freq = TermFrequency::from_tokens(&analyzer.analyze("aaaa"), &vocab);
///
/// assert_eq!(freq.term_count(vocab.index_of("aaa").unwrap() as u32), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TermFrequency {
    term_count: HashMap<u32, u64, RandomState>,
    total_term_count: u64,
}

impl TermFrequency {
    pub fn new() -> Self {
        TermFrequency {
            term_count: HashMap::with_hasher(RandomState::new()),
            total_term_count: 0,
        }
    }

    /// Count the tokens of one string against `vocab`
    ///
    /// # Arguments
    /// * `tokens` - tokens produced by the analyzer
    /// * `vocab` - column table, unknown tokens are skipped
    pub fn from_tokens<T>(tokens: &[T], vocab: &Vocabulary) -> Self
    where
        T: AsRef<str>,
    {
        let mut freq = Self::new();
        for token in tokens {
            if let Some(col) = vocab.index_of(token.as_ref()) {
                freq.add_term(col as u32);
            }
        }
        freq
    }

    /// Add one occurrence of column `col`
    #[inline]
    pub fn add_term(&mut self, col: u32) -> &mut Self {
        *self.term_count.entry(col).or_insert(0) += 1;
        self.total_term_count += 1;
        self
    }

    #[inline]
    pub fn term_count(&self, col: u32) -> u64 {
        self.term_count.get(&col).copied().unwrap_or(0)
    }

    /// total number of counted occurrences
    #[inline]
    pub fn term_sum(&self) -> u64 {
        self.total_term_count
    }

    /// number of distinct columns
    #[inline]
    pub fn term_num(&self) -> usize {
        self.term_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.term_count.is_empty()
    }

    /// distinct columns, unordered
    pub fn columns(&self) -> impl Iterator<Item = u32> + '_ {
        self.term_count.keys().copied()
    }

    /// (columns, counts) sorted by column
    /// hash order never leaks out of here
    pub fn sorted_counts(&self) -> (Vec<u32>, Vec<u64>) {
        let mut inds: Vec<u32> = Vec::with_capacity(self.term_count.len());
        let mut vals: Vec<u64> = Vec::with_capacity(self.term_count.len());
        for (&col, &count) in &self.term_count {
            inds.push(col);
            vals.push(count);
        }
        radix_sort_u32_soa(&mut inds, &mut vals);
        (inds, vals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Analyzer, TokenizeConfig};
    use crate::vectorizer::analyzer::NgramAnalyzer;

    #[test]
    fn counts_known_tokens_only() {
        let analyzer = NgramAnalyzer::new(&TokenizeConfig::default().analyzer(Analyzer::Word).n(1));
        let vocab = Vocabulary::build(&[&["red green"][..]], &analyzer);
        let freq = TermFrequency::from_tokens(&analyzer.analyze("green blue green red"), &vocab);

        assert_eq!(freq.term_count(0), 1); // red
        assert_eq!(freq.term_count(1), 2); // green
        assert_eq!(freq.term_sum(), 3);
        assert_eq!(freq.term_num(), 2);
        assert_eq!(freq.sorted_counts(), (vec![0, 1], vec![1, 2]));
    }

    #[test]
    fn no_known_tokens_is_empty() {
        let vocab = Vocabulary::default();
        let freq = TermFrequency::from_tokens(&["abc", "bcd"], &vocab);
        assert!(freq.is_empty());
        assert_eq!(freq.term_sum(), 0);
        assert_eq!(freq.sorted_counts(), (vec![], vec![]));
    }
}
