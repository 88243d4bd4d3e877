pub mod assemble;
pub mod top_n;

use crate::{
    config::{MatchConfig, OutputFormat, TokenizeConfig},
    error::{FuzzRushError, Result},
    matcher::{assemble::MatchOutput, top_n::{par_sparse_dot_topn, sparse_dot_topn}},
    utils::sparse::CsrMatrix,
    vectorizer::{analyzer::NgramAnalyzer, vocabulary::Vocabulary, TFIDFVectorizer},
};

/// Fuzzy matcher between a source and a target collection of names
///
/// Works in two phases:
/// 1. `tokenize` builds the shared n-gram vocabulary over both collections
/// 2. `match_names` vectorizes both sides and runs the sparse top-n product
///
/// `match_names` can be called any number of times after one `tokenize`,
/// e.g. with different `ntop` / `lower_bound`. TF-IDF weights are derived
/// again on every call.
///
/// # Examples
/// ```
/// use fuzz_rush::{FuzzRush, MatchConfig, OutputFormat, TokenizeConfig};
///
/// let mut matcher = FuzzRush::new(
///     vec!["Apple Inc", "Microsoft Corp"],
///     vec!["Apple", "Microsoft", "Google"],
/// );
/// matcher.tokenize(&TokenizeConfig::default()).unwrap();
/// let output = matcher.match_names(&MatchConfig::default(), OutputFormat::Flat).unwrap();
///
/// let flat = output.as_flat().unwrap();
/// assert_eq!(flat.list[0].target_name, "Apple");
/// assert_eq!(flat.list[1].target_name, "Microsoft");
/// ```
#[derive(Debug, Clone)]
pub struct FuzzRush<S = String>
where
    S: AsRef<str>,
{
    source_names: Vec<S>,
    target_names: Vec<S>,
    analyzer: Option<NgramAnalyzer>,
    vocab: Option<Vocabulary>,
    result: Option<CsrMatrix<f64>>,
}

impl<S> FuzzRush<S>
where
    S: AsRef<str>,
{
    pub fn new(source_names: Vec<S>, target_names: Vec<S>) -> Self {
        Self {
            source_names,
            target_names,
            analyzer: None,
            vocab: None,
            result: None,
        }
    }

    /// Build the shared vocabulary over source + target strings.
    /// Replaces any earlier vocabulary and drops the last result.
    pub fn tokenize(&mut self, config: &TokenizeConfig) -> Result<&Vocabulary> {
        config.validate()?;
        let analyzer = NgramAnalyzer::new(config);
        let vocab = Vocabulary::build(&[&self.source_names[..], &self.target_names[..]], &analyzer);
        tracing::info!(
            sources = self.source_names.len(),
            targets = self.target_names.len(),
            vocab_size = vocab.len(),
            "tokenized"
        );
        self.analyzer = Some(analyzer);
        self.result = None;
        Ok(self.vocab.insert(vocab))
    }

    /// Match every source string against the target strings
    ///
    /// # Arguments
    /// * `config` - `ntop`, `lower_bound`, parallel switch
    /// * `format` - flat records or grouped by source index
    ///
    /// # Errors
    /// * `InvalidConfiguration` - checked before any vectorization
    /// * `NotTokenized` - `tokenize` was never called
    pub fn match_names(&mut self, config: &MatchConfig, format: OutputFormat) -> Result<MatchOutput> {
        config.validate()?;
        let (vocab, analyzer) = match (&self.vocab, self.analyzer) {
            (Some(vocab), Some(analyzer)) => (vocab, analyzer),
            _ => return Err(FuzzRushError::NotTokenized),
        };

        let vectorizer: TFIDFVectorizer<f64> = TFIDFVectorizer::new(vocab, analyzer);
        let a = vectorizer.fit_transform(&self.source_names);
        let b_t = vectorizer.fit_transform(&self.target_names).transpose();

        let result = if config.parallel {
            par_sparse_dot_topn(&a, &b_t, config.ntop, config.lower_bound)?
        } else {
            sparse_dot_topn(&a, &b_t, config.ntop, config.lower_bound)?
        };
        tracing::info!(
            ntop = config.ntop,
            lower_bound = config.lower_bound,
            matches = result.nnz(),
            "matched"
        );

        let output = MatchOutput::assemble(&result, &self.source_names, &self.target_names, format)?;
        self.result = Some(result);
        Ok(output)
    }

    pub fn source_names(&self) -> &[S] {
        &self.source_names
    }

    pub fn target_names(&self) -> &[S] {
        &self.target_names
    }

    /// vocabulary built by the last `tokenize`
    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocab.as_ref()
    }

    /// `M x N` sparse result of the last `match_names`
    pub fn result_matrix(&self) -> Option<&CsrMatrix<f64>> {
        self.result.as_ref()
    }
}

/// One-shot tokenize + match.
/// Both configurations are validated before any work starts.
pub fn match_strings<S>(
    source_names: &[S],
    target_names: &[S],
    tokenize: &TokenizeConfig,
    config: &MatchConfig,
    format: OutputFormat,
) -> Result<MatchOutput>
where
    S: AsRef<str>,
{
    tokenize.validate()?;
    config.validate()?;
    let mut matcher = FuzzRush::new(
        source_names.iter().map(|s| s.as_ref()).collect::<Vec<&str>>(),
        target_names.iter().map(|s| s.as_ref()).collect::<Vec<&str>>(),
    );
    matcher.tokenize(tokenize)?;
    matcher.match_names(config, format)
}
