use serde::{Deserialize, Serialize};

use crate::error::{FuzzRushError, Result};

/// Tokenization rule used to split a string into n-grams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Analyzer {
    /// Character n-grams inside word boundaries.
    /// Each whitespace separated word is padded with a single space on
    /// both sides before windowing, so word edges become part of the n-grams.
    #[default]
    CharWb,
    /// Plain character n-grams over the whole (whitespace collapsed) string
    Char,
    /// Runs of `n` consecutive words.
    /// A word is a run of at least 2 alphanumeric or `_` characters.
    Word,
}

/// Output shape of a match call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// One record per match, row-major
    #[default]
    Flat,
    /// Source index -> list of (target index, score)
    Grouped,
}

/// Configuration of the vocabulary builder
///
/// # Examples
/// ```
/// use fuzz_rush::{Analyzer, TokenizeConfig};
///
/// let config = TokenizeConfig::default().analyzer(Analyzer::Word).n(2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizeConfig {
    pub analyzer: Analyzer,
    /// gram length
    pub n: usize,
    /// lowercase input before tokenizing
    pub lowercase: bool,
}

impl Default for TokenizeConfig {
    fn default() -> Self {
        Self {
            analyzer: Analyzer::CharWb,
            n: 3,
            lowercase: true,
        }
    }
}

impl TokenizeConfig {
    pub fn analyzer(mut self, analyzer: Analyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    pub fn lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n == 0 {
            return Err(FuzzRushError::invalid("n", "gram length must be positive"));
        }
        Ok(())
    }
}

/// Configuration of one match call
///
/// `ntop` bounds the number of candidates kept per source row,
/// `lower_bound` drops candidates scoring below it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub ntop: usize,
    pub lower_bound: f64,
    /// Process source rows on the rayon pool.
    /// Results are identical to the sequential path.
    pub parallel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            ntop: 1,
            lower_bound: 0.0,
            parallel: false,
        }
    }
}

impl MatchConfig {
    pub fn ntop(mut self, ntop: usize) -> Self {
        self.ntop = ntop;
        self
    }

    pub fn lower_bound(mut self, lower_bound: f64) -> Self {
        self.lower_bound = lower_bound;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.ntop == 0 {
            return Err(FuzzRushError::invalid("ntop", "must be at least 1"));
        }
        // NaN fails the range check as well
        if !(0.0..1.0).contains(&self.lower_bound) {
            return Err(FuzzRushError::invalid(
                "lower_bound",
                format!("{} is outside [0, 1)", self.lower_bound),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_trigram_top1() {
        let t = TokenizeConfig::default();
        assert_eq!(t.analyzer, Analyzer::CharWb);
        assert_eq!(t.n, 3);
        assert!(t.lowercase);

        let m = MatchConfig::default();
        assert_eq!(m.ntop, 1);
        assert_eq!(m.lower_bound, 0.0);
        assert!(!m.parallel);
        assert!(t.validate().is_ok());
        assert!(m.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = TokenizeConfig::default().n(0).validate().unwrap_err();
        assert!(matches!(err, FuzzRushError::InvalidConfiguration { field: "n", .. }));

        let err = MatchConfig::default().ntop(0).validate().unwrap_err();
        assert!(matches!(err, FuzzRushError::InvalidConfiguration { field: "ntop", .. }));

        for lb in [-0.1, 1.0, 1.5, f64::NAN, f64::INFINITY] {
            let err = MatchConfig::default().lower_bound(lb).validate().unwrap_err();
            assert!(err.is_configuration(), "lower_bound {lb} should be rejected");
        }
        assert!(MatchConfig::default().lower_bound(0.999).validate().is_ok());
    }

    #[test]
    fn configs_survive_cbor() {
        let t = TokenizeConfig::default().analyzer(Analyzer::Word).n(2).lowercase(false);
        let m = MatchConfig::default().ntop(5).lower_bound(0.25).parallel(true);

        let t_bytes = serde_cbor::to_vec(&t).unwrap();
        let m_bytes = serde_cbor::to_vec(&m).unwrap();
        assert_eq!(serde_cbor::from_slice::<TokenizeConfig>(&t_bytes).unwrap(), t);
        assert_eq!(serde_cbor::from_slice::<MatchConfig>(&m_bytes).unwrap(), m);
    }
}
