use std::borrow::Cow;

use crate::config::{Analyzer, TokenizeConfig};

/// Word boundary marker for `Analyzer::CharWb`
pub const BOUNDARY: char = ' ';

/// n-gram extractor
/// Turns a single string into its sequence of n-gram tokens.
/// Tokens are returned in order of appearance, duplicates included,
/// so the caller can count term frequencies from the output directly.
///
/// # Examples
/// ```
/// use fuzz_rush::{NgramAnalyzer, TokenizeConfig};
///
/// let analyzer = NgramAnalyzer::new(&TokenizeConfig::default());
/// assert_eq!(analyzer.analyze("Abc"), vec![" ab", "abc", "bc "]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NgramAnalyzer {
    analyzer: Analyzer,
    n: usize,
    lowercase: bool,
}

impl NgramAnalyzer {
    /// `config` is expected to be validated already; `n == 0` yields no tokens
    pub fn new(config: &TokenizeConfig) -> Self {
        Self {
            analyzer: config.analyzer,
            n: config.n,
            lowercase: config.lowercase,
        }
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn kind(&self) -> Analyzer {
        self.analyzer
    }

    /// Split `text` into n-gram tokens
    ///
    /// # Arguments
    /// * `text` - input string
    ///
    /// # Returns
    /// * `Vec<String>` - tokens, empty when `text` is shorter than `n`
    pub fn analyze(&self, text: &str) -> Vec<String> {
        if self.n == 0 {
            return Vec::new();
        }
        let text: Cow<'_, str> = if self.lowercase {
            Cow::Owned(text.to_lowercase())
        } else {
            Cow::Borrowed(text)
        };
        match self.analyzer {
            Analyzer::CharWb => self.char_wb_ngrams(&text),
            Analyzer::Char => self.char_ngrams(&text),
            Analyzer::Word => self.word_ngrams(&text),
        }
    }

    fn char_wb_ngrams(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut padded: Vec<char> = Vec::new();
        for word in text.split_whitespace() {
            padded.clear();
            padded.push(BOUNDARY);
            padded.extend(word.chars());
            padded.push(BOUNDARY);
            // padded word shorter than n: no gram
            tokens.extend(padded.windows(self.n).map(|w| w.iter().collect::<String>()));
        }
        tokens
    }

    fn char_ngrams(&self, text: &str) -> Vec<String> {
        // whitespace runs collapse to a single space
        let chars: Vec<char> = text
            .split_whitespace()
            .collect::<Vec<&str>>()
            .join(" ")
            .chars()
            .collect();
        chars
            .windows(self.n)
            .map(|w| w.iter().collect::<String>())
            .collect()
    }

    fn word_ngrams(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|w| w.chars().count() >= 2)
            .collect();
        words.windows(self.n).map(|w| w.join(" ")).collect()
    }
}
