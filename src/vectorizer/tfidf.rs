use num::Float;

use super::term::TermFrequency;

/// TF-IDF calculation engine
/// Plugs the weighting scheme into `TFIDFVectorizer<N, E>`.
pub trait TFIDFEngine<N>
where
    N: Float,
{
    /// IDF vector over the vocabulary columns
    ///
    /// # Arguments
    /// * `doc_freq` - number of strings containing each column
    /// * `doc_num` - number of strings in the collection
    ///
    /// # Returns
    /// * `Vec<N>` - IDF per column
    fn idf_vec(doc_freq: &[u64], doc_num: u64) -> Vec<N>;

    /// Weighted row for one string
    ///
    /// # Returns
    /// * `(Vec<u32>, Vec<N>)` - column-sorted indices and weights
    fn tf_idf_row(freq: &TermFrequency, idf: &[N]) -> (Vec<u32>, Vec<N>);
}

/// Default engine
/// - raw term counts as TF
/// - smoothed IDF `ln((1 + D) / (1 + df)) + 1`
/// - rows L2-normalized so a dot product is a cosine similarity
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl DefaultTFIDFEngine {
    #[inline]
    pub fn idf(doc_num: u64, doc_freq: u64) -> f64 {
        ((1.0 + doc_num as f64) / (1.0 + doc_freq as f64)).ln() + 1.0
    }
}

impl<N> TFIDFEngine<N> for DefaultTFIDFEngine
where
    N: Float,
{
    fn idf_vec(doc_freq: &[u64], doc_num: u64) -> Vec<N> {
        doc_freq
            .iter()
            .map(|&df| N::from(Self::idf(doc_num, df)).unwrap_or_else(N::one))
            .collect()
    }

    fn tf_idf_row(freq: &TermFrequency, idf: &[N]) -> (Vec<u32>, Vec<N>) {
        let (inds, counts) = freq.sorted_counts();
        let mut vals: Vec<N> = inds
            .iter()
            .zip(counts.iter())
            .map(|(&col, &count)| {
                let tf = N::from(count).unwrap_or_else(N::zero);
                tf * idf.get(col as usize).copied().unwrap_or_else(N::zero)
            })
            .collect();

        let norm = vals.iter().fold(N::zero(), |acc, &v| acc + v * v).sqrt();
        // zero row stays zero
        if norm > N::zero() {
            vals.iter_mut().for_each(|v| *v = *v / norm);
        }
        (inds, vals)
    }
}
