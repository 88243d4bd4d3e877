pub mod analyzer;
pub mod term;
pub mod tfidf;
pub mod vocabulary;

use std::marker::PhantomData;

use num::Float;

use crate::utils::sparse::CsrMatrix;
use crate::vectorizer::{analyzer::NgramAnalyzer, term::TermFrequency, tfidf::{DefaultTFIDFEngine, TFIDFEngine}, vocabulary::Vocabulary};

/// TF-IDF Vectorizer
/// Turns a collection of strings into a CSR matrix of L2-normalized TF-IDF rows
/// over a fixed, shared vocabulary.
///
/// IDF is fitted on the collection passed to `fit_transform`, so source and
/// target collections each get their own IDF even though they share columns.
#[derive(Debug, Clone, Copy)]
pub struct TFIDFVectorizer<'v, N = f64, E = DefaultTFIDFEngine>
where
    N: Float,
    E: TFIDFEngine<N>,
{
    vocab: &'v Vocabulary,
    analyzer: NgramAnalyzer,
    _marker: PhantomData<(N, E)>,
}

impl<'v, N, E> TFIDFVectorizer<'v, N, E>
where
    N: Float,
    E: TFIDFEngine<N>,
{
    pub fn new(vocab: &'v Vocabulary, analyzer: NgramAnalyzer) -> Self {
        Self {
            vocab,
            analyzer,
            _marker: PhantomData,
        }
    }

    pub fn vocabulary(&self) -> &'v Vocabulary {
        self.vocab
    }

    /// Fit IDF on `strings` and return their weighted rows
    ///
    /// # Returns
    /// * `CsrMatrix<N>` - `strings.len() x vocab.len()`
    pub fn fit_transform<S>(&self, strings: &[S]) -> CsrMatrix<N>
    where
        S: AsRef<str>,
    {
        let freqs: Vec<TermFrequency> = strings
            .iter()
            .map(|s| TermFrequency::from_tokens(&self.analyzer.analyze(s.as_ref()), self.vocab))
            .collect();

        let mut doc_freq = vec![0u64; self.vocab.len()];
        for freq in &freqs {
            for col in freq.columns() {
                doc_freq[col as usize] += 1;
            }
        }
        let idf: Vec<N> = E::idf_vec(&doc_freq, freqs.len() as u64);

        let nnz_hint = freqs.iter().map(|f| f.term_num()).sum();
        let mut matrix = CsrMatrix::with_capacity(self.vocab.len(), freqs.len(), nnz_hint);
        let mut zero_rows = 0usize;
        for freq in &freqs {
            let (inds, vals) = E::tf_idf_row(freq, &idf);
            if inds.is_empty() {
                zero_rows += 1;
            }
            matrix.push_row(&inds, &vals);
        }
        tracing::debug!(
            rows = matrix.n_rows(),
            cols = matrix.n_cols(),
            nnz = matrix.nnz(),
            zero_rows,
            "vectorized collection"
        );
        matrix
    }
}
